use axum::{extract::State, routing::get, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::{
    handler::{accounts::AccountResponse, ApiError, ErrorResponse},
    state::AppState,
};

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/me", get(me))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Account behind the session cookie", body = AccountResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 503, description = "Session store not configured", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<AccountResponse>, ApiError> {
    let auth = state.auth().ok_or_else(ApiError::sessions_unavailable)?;
    let Some(cookie) = jar.get(&state.config().values().auth_cookie_name) else {
        return Err(ApiError::unauthorized("missing session"));
    };

    match auth.me(cookie.value()).await? {
        Some(account) => Ok(Json(account.into())),
        None => Err(ApiError::unauthorized("invalid session")),
    }
}
