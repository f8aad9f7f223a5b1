use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    handler::{ApiError, ErrorResponse},
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct RegisterMobileRequest {
    pub mobile_number: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterMobileResponse {
    pub account_uid: Uuid,
    pub mobile_number: String,
    pub verification_required: bool,
    pub verification_expires_at: Option<DateTime<Utc>>,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/auth/register/mobile", post(register_mobile))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register/mobile",
    request_body = RegisterMobileRequest,
    responses(
        (status = 201, description = "Created, verification code sent by SMS", body = RegisterMobileResponse),
        (status = 400, description = "Invalid or taken mobile number", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_mobile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterMobileRequest>,
) -> Result<(StatusCode, Json<RegisterMobileResponse>), ApiError> {
    let account = state
        .accounts()
        .register_mobile(&payload.mobile_number)
        .await?;

    let response = RegisterMobileResponse {
        account_uid: account.uid,
        mobile_number: account.mobile_number.unwrap_or_default(),
        verification_required: !account.phone_verified,
        verification_expires_at: account
            .verification_code_expiry
            .map(|expiry| expiry.with_timezone(&Utc)),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
