use sea_orm::{DbErr, SqlErr, TransactionError};

pub mod account_credentials;
pub mod accounts;
pub mod vendor_profiles;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Db(DbErr),
}

impl From<DbErr> for RepoError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::Conflict(detail),
            _ => RepoError::Db(err),
        }
    }
}

impl From<TransactionError<DbErr>> for RepoError {
    fn from(err: TransactionError<DbErr>) -> Self {
        match err {
            TransactionError::Connection(err) | TransactionError::Transaction(err) => err.into(),
        }
    }
}
