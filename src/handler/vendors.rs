use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    handler::{
        accounts::{parse_uid, AccountFields, AccountResponse},
        ApiError, ErrorResponse,
    },
    repo::accounts::NewVendorProfile,
    service::accounts::VendorAccount,
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct CreateVendor {
    #[serde(flatten)]
    pub account: AccountFields,
    pub vendor_name: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct VendorResponse {
    pub account: AccountResponse,
    pub vendor_name: Option<String>,
    pub category: Option<String>,
}

impl From<VendorAccount> for VendorResponse {
    fn from(vendor: VendorAccount) -> Self {
        Self {
            vendor_name: vendor.profile.vendor_name,
            category: vendor.profile.category,
            account: vendor.account.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    request_body = CreateVendor,
    responses(
        (status = 201, description = "Created, or the existing vendor for that email", body = VendorResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateVendor>,
) -> Result<(StatusCode, Json<VendorResponse>), ApiError> {
    let vendor = state
        .accounts()
        .create_vendor(
            payload.account.into_input(),
            NewVendorProfile {
                vendor_name: payload.vendor_name,
                category: payload.category,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(vendor.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/vendors/{uid}",
    params(
        ("uid" = String, Path, description = "Vendor account uid")
    ),
    responses(
        (status = 200, description = "Vendor", body = VendorResponse),
        (status = 404, description = "Not found or not a vendor", body = ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<VendorResponse>, ApiError> {
    let uid = parse_uid(&uid)?;
    match state.accounts().get_vendor(uid).await? {
        Some(vendor) => Ok(Json(vendor.into())),
        None => Err(ApiError::not_found()),
    }
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/vendors", post(create_vendor))
        .route("/api/v1/vendors/:uid", get(get_vendor))
        .with_state(state)
}
