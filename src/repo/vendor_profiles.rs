use async_trait::async_trait;
use sea_orm::EntityTrait;

use crate::{entities::vendor_profiles, repo::RepoError, state::DatabaseClient};

#[async_trait]
pub trait VendorProfilesRepo: Send + Sync {
    async fn find_by_account_id(
        &self,
        account_id: i64,
    ) -> Result<Option<vendor_profiles::Model>, RepoError>;
}

pub struct SeaOrmVendorProfilesRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmVendorProfilesRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VendorProfilesRepo for SeaOrmVendorProfilesRepo {
    async fn find_by_account_id(
        &self,
        account_id: i64,
    ) -> Result<Option<vendor_profiles::Model>, RepoError> {
        Ok(vendor_profiles::Entity::find_by_id(account_id)
            .one(self.db.conn())
            .await?)
    }
}
