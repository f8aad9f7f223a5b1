use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entities::{account_credentials, accounts, accounts::Gender, vendor_profiles},
    repo::RepoError,
    state::DatabaseClient,
};

pub const DEFAULT_LOCATION: &str = "Unknown";

/// Optional profile attributes accepted at creation time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountAttributes {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    pub is_routable: bool,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// Defaults to active.
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewVendorProfile {
    pub vendor_name: Option<String>,
    pub category: Option<String>,
}

/// Fully validated row set for one account.
#[derive(Clone, Debug, Default)]
pub struct NewAccount {
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub password_hash: Option<String>,
    pub is_staff: bool,
    pub is_vendor: bool,
    pub is_superuser: bool,
    pub attributes: AccountAttributes,
    pub vendor: Option<NewVendorProfile>,
}

/// What one [`AccountsRepo::insert`] wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedAccount {
    pub account: accounts::Model,
    pub vendor_profile: Option<vendor_profiles::Model>,
}

#[async_trait]
pub trait AccountsRepo: Send + Sync {
    /// Inserts the account with its password credential and vendor profile, atomically.
    async fn insert(&self, account: NewAccount) -> Result<CreatedAccount, RepoError>;
    async fn find_by_uid(&self, uid: Uuid) -> Result<Option<accounts::Model>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>, RepoError>;
    async fn find_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<accounts::Model>, RepoError>;
    async fn update(&self, model: accounts::Model) -> Result<accounts::Model, RepoError>;
}

pub struct SeaOrmAccountsRepo {
    db: std::sync::Arc<dyn DatabaseClient>,
}

impl SeaOrmAccountsRepo {
    pub fn new(db: std::sync::Arc<dyn DatabaseClient>) -> Self {
        Self { db }
    }
}

fn account_active_model(account: &NewAccount) -> accounts::ActiveModel {
    let attributes = &account.attributes;
    accounts::ActiveModel {
        id: NotSet,
        uid: Set(Uuid::new_v4()),
        email: Set(account.email.clone()),
        mobile_number: Set(account.mobile_number.clone()),
        username: Set(attributes.username.clone()),
        first_name: Set(attributes.first_name.clone().unwrap_or_default()),
        last_name: Set(attributes.last_name.clone().unwrap_or_default()),
        date_of_birth: Set(attributes.date_of_birth),
        is_active: Set(attributes.is_active.unwrap_or(true)),
        is_staff: Set(account.is_staff),
        is_vendor: Set(account.is_vendor),
        is_superuser: Set(account.is_superuser),
        address: Set(attributes.address.clone()),
        gender: Set(attributes.gender.map(|gender| gender.as_str().to_string())),
        profile_picture: Set(attributes.profile_picture.clone()),
        email_verified: Set(false),
        phone_verified: Set(false),
        location: Set(attributes
            .location
            .clone()
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string())),
        is_routable: Set(attributes.is_routable),
        verification_code: Set(None),
        verification_code_expiry: Set(None),
        latitude: Set(attributes.latitude),
        longitude: Set(attributes.longitude),
        created_at: NotSet,
        updated_at: NotSet,
    }
}

fn changed_active_model(model: accounts::Model) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: sea_orm::Unchanged(model.id),
        uid: sea_orm::Unchanged(model.uid),
        email: Set(model.email),
        mobile_number: Set(model.mobile_number),
        username: Set(model.username),
        first_name: Set(model.first_name),
        last_name: Set(model.last_name),
        date_of_birth: Set(model.date_of_birth),
        is_active: Set(model.is_active),
        is_staff: Set(model.is_staff),
        is_vendor: Set(model.is_vendor),
        is_superuser: Set(model.is_superuser),
        address: Set(model.address),
        gender: Set(model.gender),
        profile_picture: Set(model.profile_picture),
        email_verified: Set(model.email_verified),
        phone_verified: Set(model.phone_verified),
        location: Set(model.location),
        is_routable: Set(model.is_routable),
        verification_code: Set(model.verification_code),
        verification_code_expiry: Set(model.verification_code_expiry),
        latitude: Set(model.latitude),
        longitude: Set(model.longitude),
        created_at: sea_orm::Unchanged(model.created_at),
        updated_at: sea_orm::Unchanged(model.updated_at),
    }
}

#[async_trait]
impl AccountsRepo for SeaOrmAccountsRepo {
    async fn insert(&self, account: NewAccount) -> Result<CreatedAccount, RepoError> {
        let created = self
            .db
            .conn()
            .transaction::<_, CreatedAccount, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let model = account_active_model(&account).insert(txn).await?;

                    if let Some(password_hash) = account.password_hash {
                        account_credentials::ActiveModel {
                            account_id: Set(model.id),
                            provider: Set(account_credentials::PROVIDER_PASSWORD.to_string()),
                            password_hash: Set(Some(password_hash)),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                    }

                    let vendor_profile = match account.vendor {
                        Some(vendor) => Some(
                            vendor_profiles::ActiveModel {
                                account_id: Set(model.id),
                                vendor_name: Set(vendor.vendor_name),
                                category: Set(vendor.category),
                                ..Default::default()
                            }
                            .insert(txn)
                            .await?,
                        ),
                        None => None,
                    };

                    Ok(CreatedAccount {
                        account: model,
                        vendor_profile,
                    })
                })
            })
            .await?;

        Ok(created)
    }

    async fn find_by_uid(&self, uid: Uuid) -> Result<Option<accounts::Model>, RepoError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Uid.eq(uid))
            .one(self.db.conn())
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>, RepoError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(self.db.conn())
            .await?)
    }

    async fn find_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<accounts::Model>, RepoError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::MobileNumber.eq(mobile_number))
            .one(self.db.conn())
            .await?)
    }

    async fn update(&self, model: accounts::Model) -> Result<accounts::Model, RepoError> {
        Ok(changed_active_model(model).update(self.db.conn()).await?)
    }
}
