use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::{
    config::Config,
    repo::{
        account_credentials::SeaOrmAccountCredentialsRepo, accounts::SeaOrmAccountsRepo,
        vendor_profiles::SeaOrmVendorProfilesRepo,
    },
    service::{
        accounts::{AccountsService, AccountsServiceImpl, OtpSettings},
        auth::{AuthService, AuthServiceImpl},
        config::ConfigService,
        notify::ConfiguredNotifier,
        session::{RedisSessionService, SessionError},
    },
};

pub trait DatabaseClient: Send + Sync {
    fn conn(&self) -> &DatabaseConnection;
}

pub struct SeaOrmDatabaseClient {
    conn: DatabaseConnection,
}

impl SeaOrmDatabaseClient {
    pub async fn new(config: &Config) -> Result<Self, DbErr> {
        let conn = crate::db::connect(config.database_url.as_deref()).await?;
        crate::schema::apply(&conn).await?;
        Ok(Self { conn })
    }
}

impl DatabaseClient for SeaOrmDatabaseClient {
    fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database setup failed: {0}")]
    Database(#[from] DbErr),
    #[error("session store setup failed: {0}")]
    Sessions(#[from] SessionError),
}

pub struct AppState {
    config: Arc<dyn ConfigService>,
    accounts: Arc<dyn AccountsService>,
    auth: Option<Arc<dyn AuthService>>,
}

impl AppState {
    pub async fn new(config: Arc<dyn ConfigService>) -> Result<Arc<Self>, StartupError> {
        let values = config.values().clone();
        let db = Arc::new(SeaOrmDatabaseClient::new(&values).await?);
        let accounts_repo = Arc::new(SeaOrmAccountsRepo::new(db.clone()));
        let credentials_repo = Arc::new(SeaOrmAccountCredentialsRepo::new(db.clone()));
        let vendor_profiles_repo = Arc::new(SeaOrmVendorProfilesRepo::new(db.clone()));

        let accounts = Arc::new(AccountsServiceImpl::new(
            accounts_repo.clone(),
            vendor_profiles_repo,
            Arc::new(ConfiguredNotifier::new(values.clone())),
            OtpSettings {
                length: values.otp_length,
                ttl_seconds: values.otp_ttl_seconds,
            },
        ));

        let auth: Option<Arc<dyn AuthService>> = match values.redis_url.as_deref() {
            Some(redis_url) => {
                let sessions = RedisSessionService::new(
                    redis_url,
                    values.auth_cookie_max_age_seconds,
                    values.session_key_prefix.clone(),
                )
                .await?;
                Some(Arc::new(AuthServiceImpl::new(
                    accounts_repo,
                    credentials_repo,
                    Arc::new(sessions),
                )))
            }
            None => {
                tracing::warn!("REDIS_URL is not set, login endpoints are disabled");
                None
            }
        };

        Ok(Arc::new(Self {
            config,
            accounts,
            auth,
        }))
    }

    pub fn accounts(&self) -> &dyn AccountsService {
        self.accounts.as_ref()
    }

    /// `None` when no session store is configured.
    pub fn auth(&self) -> Option<&dyn AuthService> {
        self.auth.as_deref()
    }

    pub fn config(&self) -> &dyn ConfigService {
        self.config.as_ref()
    }
}
