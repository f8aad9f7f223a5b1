use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    entities::{account_credentials::PROVIDER_PASSWORD, accounts},
    repo::{account_credentials::AccountCredentialsRepo, accounts::AccountsRepo, RepoError},
    service::{
        password,
        session::{LoginMethod, SessionError, SessionService},
        validation,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("session store error: {0}")]
    Session(#[from] SessionError),
    #[error("storage error: {0}")]
    Storage(#[from] RepoError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Session(_) => "session_error",
            AuthError::Storage(_) => "db_error",
        }
    }
}

#[derive(Debug)]
pub struct LoginOutput {
    pub account: accounts::Model,
    pub session_id: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutput, AuthError>;
    async fn logout(&self, session_id: &str) -> Result<(), AuthError>;
    /// Resolves a session to its account. Expired sessions and inactive accounts yield `None`.
    async fn me(&self, session_id: &str) -> Result<Option<accounts::Model>, AuthError>;
}

pub struct AuthServiceImpl {
    accounts_repo: Arc<dyn AccountsRepo>,
    credentials_repo: Arc<dyn AccountCredentialsRepo>,
    sessions: Arc<dyn SessionService>,
}

impl AuthServiceImpl {
    pub fn new(
        accounts_repo: Arc<dyn AccountsRepo>,
        credentials_repo: Arc<dyn AccountCredentialsRepo>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            accounts_repo,
            credentials_repo,
            sessions,
        }
    }

    /// Identifiers with `@` are emails, anything else a mobile number.
    async fn find_account(
        &self,
        identifier: &str,
    ) -> Result<Option<(accounts::Model, LoginMethod)>, AuthError> {
        let identifier = identifier.trim();
        if identifier.contains('@') {
            let Ok(email) = validation::normalize_email(identifier) else {
                return Ok(None);
            };
            let account = self.accounts_repo.find_by_email(&email).await?;
            return Ok(account.map(|account| (account, LoginMethod::Email)));
        }

        let Ok(mobile_number) = validation::validate_mobile_number(identifier) else {
            return Ok(None);
        };
        let account = self
            .accounts_repo
            .find_by_mobile_number(&mobile_number)
            .await?;
        Ok(account.map(|account| (account, LoginMethod::MobileNumber)))
    }

    /// Fails a login after spending the same argon2 work as a real check.
    fn reject(password: &str) -> AuthError {
        password::verify_against_placeholder(password);
        AuthError::InvalidCredentials
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutput, AuthError> {
        let Some((account, login_method)) = self.find_account(identifier).await? else {
            return Err(Self::reject(password));
        };

        if !account.is_active {
            tracing::debug!(account_uid = %account.uid, "login refused for inactive account");
            return Err(Self::reject(password));
        }

        let hash = self
            .credentials_repo
            .find_by_account_and_provider(account.id, PROVIDER_PASSWORD)
            .await?
            .and_then(|credential| credential.password_hash);
        let Some(hash) = hash else {
            return Err(Self::reject(password));
        };

        if !password::verify_password(&hash, password) {
            return Err(AuthError::InvalidCredentials);
        }

        let session_id = self.sessions.create(account.uid, login_method).await?;
        tracing::info!(account_uid = %account.uid, ?login_method, "login succeeded");

        Ok(LoginOutput {
            account,
            session_id,
        })
    }

    async fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions.delete(session_id).await?;
        Ok(())
    }

    async fn me(&self, session_id: &str) -> Result<Option<accounts::Model>, AuthError> {
        let Some(session) = self.sessions.get(session_id).await? else {
            return Ok(None);
        };

        let account = self.accounts_repo.find_by_uid(session.account_uid).await?;
        Ok(account.filter(|account| account.is_active))
    }
}
