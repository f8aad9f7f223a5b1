use utoipa::OpenApi;

use crate::{
    entities::accounts::Gender,
    handler::{
        self,
        accounts::{AccountFields, AccountResponse, VerificationCodeRequest, VerificationCodeResponse},
        auth::{
            mobile::{RegisterMobileRequest, RegisterMobileResponse},
            password::{LoginRequest, LoginResponse},
        },
        health::Health,
        vendors::{CreateVendor, VendorResponse},
        ErrorResponse,
    },
    service::accounts::VerificationChannel,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::health::health,
        handler::accounts::create_account,
        handler::accounts::get_account,
        handler::accounts::issue_verification_code,
        handler::vendors::create_vendor,
        handler::vendors::get_vendor,
        handler::auth::mobile::register_mobile,
        handler::auth::password::login,
        handler::auth::password::logout,
        handler::session::me
    ),
    components(schemas(
        Health,
        ErrorResponse,
        Gender,
        AccountFields,
        AccountResponse,
        VerificationChannel,
        VerificationCodeRequest,
        VerificationCodeResponse,
        CreateVendor,
        VendorResponse,
        RegisterMobileRequest,
        RegisterMobileResponse,
        LoginRequest,
        LoginResponse
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "accounts", description = "Account provisioning"),
        (name = "vendors", description = "Vendor accounts"),
        (name = "auth", description = "Registration, login and sessions")
    )
)]
pub struct ApiDoc;
