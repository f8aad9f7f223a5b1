use axum::Router;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod db;
mod entities;
mod handler;
mod openapi;
mod repo;
mod schema;
mod service;
mod state;

use crate::{
    repo::accounts::AccountAttributes,
    service::config::{ConfigService, ConfigServiceImpl},
    state::AppState,
};

async fn bootstrap_superuser(state: &AppState) {
    let config = state.config().values();
    let Some(email) = config.bootstrap_superuser_email.as_deref() else {
        return;
    };

    match state
        .accounts()
        .create_superuser(
            email,
            config.bootstrap_superuser_password.as_deref(),
            AccountAttributes::default(),
        )
        .await
    {
        Ok(account) => tracing::info!(account_uid = %account.uid, "bootstrap superuser ready"),
        Err(err) => tracing::error!(error = %err, "bootstrap superuser failed"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: Arc<dyn ConfigService> = Arc::new(ConfigServiceImpl::new());
    let port = config.port();
    let state = AppState::new(config).await?;
    bootstrap_superuser(&state).await;

    let app = Router::new()
        .merge(handler::health::routes())
        .merge(handler::accounts::routes(state.clone()))
        .merge(handler::vendors::routes(state.clone()))
        .merge(handler::auth::routes(state.clone()))
        .merge(handler::session::routes(state))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
