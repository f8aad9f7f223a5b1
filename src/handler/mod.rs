use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::service::{accounts::AccountError, auth::AuthError};

pub mod accounts;
pub mod auth;
pub mod health;
pub mod session;
pub mod vendors;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Error half of every handler result. Infrastructure details are logged, not returned.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "not found")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn sessions_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "sessions_unavailable",
            "session store is not configured",
        )
    }

    fn internal(code: &'static str, err: &dyn std::error::Error) -> Self {
        tracing::error!(error = %err, code, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                code: self.code.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(err) => ApiError::bad_request(err.message()),
            AccountError::NotFound => ApiError::not_found(),
            AccountError::PasswordHash(_) => ApiError::internal("password_hash_failed", &err),
            AccountError::Storage(_) => ApiError::internal("db_error", &err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::new(
                StatusCode::UNAUTHORIZED,
                err.code(),
                "invalid credentials",
            ),
            AuthError::Session(_) | AuthError::Storage(_) => ApiError::internal(err.code(), &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::validation::ValidationError;

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: ApiError =
            AccountError::Validation(ValidationError::new("Enter a valid email address.")).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "validation_error");
        assert_eq!(err.message, "Enter a valid email address.");
    }

    #[test]
    fn infrastructure_errors_hide_details() {
        let err: ApiError = AccountError::Storage(crate::repo::RepoError::Db(
            sea_orm::DbErr::Custom("connection reset".to_string()),
        ))
        .into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal server error");

        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "invalid_credentials");
    }
}
