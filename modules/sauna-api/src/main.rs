use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sauna_api::{build_router, AppState};
use sauna_common::config::{Config, APP_NAME};
use sauna_store::RestSaunaStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    let store = RestSaunaStore::from_config(&config).context("Failed to build store client")?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        request_timeout: config.request_timeout,
        app_url: config.app_url.clone(),
    });

    let app = build_router(state, &config.allowed_origins);

    let addr = config.bind_addr();
    info!(store_url = %config.store_url, "{APP_NAME} API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
