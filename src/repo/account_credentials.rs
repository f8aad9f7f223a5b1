use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{entities::account_credentials, repo::RepoError, state::DatabaseClient};

#[async_trait]
pub trait AccountCredentialsRepo: Send + Sync {
    async fn find_by_account_and_provider(
        &self,
        account_id: i64,
        provider: &str,
    ) -> Result<Option<account_credentials::Model>, RepoError>;
}

pub struct SeaOrmAccountCredentialsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmAccountCredentialsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountCredentialsRepo for SeaOrmAccountCredentialsRepo {
    async fn find_by_account_and_provider(
        &self,
        account_id: i64,
        provider: &str,
    ) -> Result<Option<account_credentials::Model>, RepoError> {
        Ok(account_credentials::Entity::find()
            .filter(account_credentials::Column::AccountId.eq(account_id))
            .filter(account_credentials::Column::Provider.eq(provider))
            .one(self.db.conn())
            .await?)
    }
}
