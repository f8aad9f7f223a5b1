use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use redis::{aio::MultiplexedConnection, AsyncCommands};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which identifier the account signed in with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    Email,
    MobileNumber,
}

const MAX_SESSION_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub account_uid: Uuid,
    pub login_method: LoginMethod,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(account_uid: Uuid, login_method: LoginMethod, ttl_seconds: u64) -> Self {
        let created_at = Utc::now();
        let ttl = ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64;
        let expires_at = created_at + Duration::seconds(ttl);
        Self {
            account_uid,
            login_method,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("session payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn create(
        &self,
        account_uid: Uuid,
        login_method: LoginMethod,
    ) -> Result<String, SessionError>;
    /// Unknown, expired and unreadable sessions all come back as `None`.
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, SessionError>;
    async fn delete(&self, session_id: &str) -> Result<(), SessionError>;
}

fn session_key(prefix: &str, session_id: &str) -> String {
    format!("{prefix}:account-session:{session_id}")
}

/// Sessions as JSON values under `<prefix>:account-session:<id>`, expiring with the cookie.
pub struct RedisSessionService {
    conn: MultiplexedConnection,
    ttl_seconds: u64,
    key_prefix: String,
}

impl RedisSessionService {
    pub async fn new(
        redis_url: &str,
        ttl_seconds: u64,
        key_prefix: String,
    ) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::info!(%key_prefix, ttl_seconds, "redis session store connected");
        Ok(Self {
            conn,
            ttl_seconds,
            key_prefix,
        })
    }
}

#[async_trait]
impl SessionService for RedisSessionService {
    async fn create(
        &self,
        account_uid: Uuid,
        login_method: LoginMethod,
    ) -> Result<String, SessionError> {
        let session_id = Uuid::new_v4().simple().to_string();
        let session = SessionData::new(account_uid, login_method, self.ttl_seconds);
        let value = serde_json::to_string(&session)?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(
            session_key(&self.key_prefix, &session_id),
            value,
            self.ttl_seconds,
        )
        .await?;
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, SessionError> {
        let key = session_key(&self.key_prefix, session_id);
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(&key).await?;
        let Some(value) = value else {
            return Ok(None);
        };

        let session = match serde_json::from_str::<SessionData>(&value) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "dropping unreadable session payload");
                conn.del::<_, ()>(&key).await?;
                return Ok(None);
            }
        };

        if session.is_expired_at(Utc::now()) {
            conn.del::<_, ()>(&key).await?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(&self.key_prefix, session_id))
            .await?;
        Ok(())
    }
}
