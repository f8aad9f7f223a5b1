use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    handler::{
        auth::{cleared_session_cookie, session_cookie},
        ApiError, ErrorResponse,
    },
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address or mobile number.
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub account_uid: Uuid,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub username: Option<String>,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 503, description = "Session store not configured", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let auth = state.auth().ok_or_else(ApiError::sessions_unavailable)?;
    let output = auth.login(&payload.identifier, &payload.password).await?;

    let cookie = session_cookie(state.config().values(), output.session_id);
    let response = LoginResponse {
        account_uid: output.account.uid,
        email: output.account.email,
        mobile_number: output.account.mobile_number,
        username: output.account.username,
    };

    Ok((jar.add(cookie), Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Logged out, session cookie cleared"),
        (status = 503, description = "Session store not configured", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let auth = state.auth().ok_or_else(ApiError::sessions_unavailable)?;
    let config = state.config().values();

    let Some(session_id) = jar
        .get(&config.auth_cookie_name)
        .map(|cookie| cookie.value().to_string())
    else {
        return Ok((StatusCode::NO_CONTENT, jar));
    };

    auth.logout(&session_id).await?;
    Ok((StatusCode::NO_CONTENT, jar.add(cleared_session_cookie(config))))
}
