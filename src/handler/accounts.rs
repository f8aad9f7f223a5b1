use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::accounts::{self, Gender},
    handler::{ApiError, ErrorResponse},
    repo::accounts::AccountAttributes,
    service::accounts::{CreateAccountInput, VerificationChannel},
    state::AppState,
};

/// Fields shared by every account creation payload.
#[derive(Deserialize, ToSchema)]
pub struct AccountFields {
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    /// Object-storage key of an already uploaded picture.
    pub profile_picture: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_routable: bool,
    #[schema(value_type = Option<String>, example = "-33.868820")]
    pub latitude: Option<Decimal>,
    #[schema(value_type = Option<String>, example = "151.209296")]
    pub longitude: Option<Decimal>,
}

impl AccountFields {
    pub fn into_input(self) -> CreateAccountInput {
        CreateAccountInput {
            email: self.email,
            mobile_number: self.mobile_number,
            password: self.password,
            is_vendor: false,
            is_staff: false,
            attributes: AccountAttributes {
                username: self.username,
                first_name: self.first_name,
                last_name: self.last_name,
                date_of_birth: self.date_of_birth,
                address: self.address,
                gender: self.gender,
                profile_picture: self.profile_picture,
                location: self.location,
                is_routable: self.is_routable,
                latitude: self.latitude,
                longitude: self.longitude,
                is_active: None,
            },
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct VerificationCodeRequest {
    pub channel: VerificationChannel,
}

#[derive(Serialize, ToSchema)]
pub struct VerificationCodeResponse {
    pub account_uid: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct AccountResponse {
    pub uid: Uuid,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub short_name: String,
    pub display_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub profile_picture: Option<String>,
    pub location: String,
    pub is_routable: bool,
    #[schema(value_type = Option<String>)]
    pub latitude: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub longitude: Option<Decimal>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_vendor: bool,
    pub is_superuser: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            full_name: model.full_name(),
            short_name: model.short_name().to_string(),
            display_name: model.to_string(),
            uid: model.uid,
            email: model.email,
            mobile_number: model.mobile_number,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
            address: model.address,
            profile_picture: model.profile_picture,
            location: model.location,
            is_routable: model.is_routable,
            latitude: model.latitude,
            longitude: model.longitude,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_vendor: model.is_vendor,
            is_superuser: model.is_superuser,
            email_verified: model.email_verified,
            phone_verified: model.phone_verified,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

pub(crate) fn parse_uid(uid: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(uid).map_err(|_| ApiError::bad_request("invalid account uid"))
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = AccountFields,
    responses(
        (status = 201, description = "Created, or the existing account for that email", body = AccountResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AccountFields>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let account = state
        .accounts()
        .create_account(payload.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{uid}",
    params(
        ("uid" = String, Path, description = "Account uid")
    ),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let uid = parse_uid(&uid)?;
    match state.accounts().get(uid).await? {
        Some(model) => Ok(Json(model.into())),
        None => Err(ApiError::not_found()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts/{uid}/verification-code",
    request_body = VerificationCodeRequest,
    params(
        ("uid" = String, Path, description = "Account uid")
    ),
    responses(
        (status = 202, description = "Code issued and dispatched", body = VerificationCodeResponse),
        (status = 400, description = "No destination for that channel", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn issue_verification_code(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(payload): Json<VerificationCodeRequest>,
) -> Result<(StatusCode, Json<VerificationCodeResponse>), ApiError> {
    let uid = parse_uid(&uid)?;
    let account = state
        .accounts()
        .issue_verification_code(uid, payload.channel)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(VerificationCodeResponse {
            account_uid: account.uid,
            expires_at: account
                .verification_code_expiry
                .map(|expiry| expiry.with_timezone(&Utc)),
        }),
    ))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/accounts", post(create_account))
        .route("/api/v1/accounts/:uid", get(get_account))
        .route(
            "/api/v1/accounts/:uid/verification-code",
            post(issue_verification_code),
        )
        .with_state(state)
}
