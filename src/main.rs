//! trackstash - flat-file HTTP storage service
//!
//! Serves user profiles, audio tracks, text edits, and raw file storage
//! over HTTP, backed by JSON files and a directory tree under a single
//! storage root.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use trackstash::config::Config;
use trackstash::store::JsonStore;
use trackstash::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting trackstash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::parse();
    config.ensure_storage_root()?;
    info!("Storage root: {}", config.storage_root.display());

    // Record maps are loaded once here; external edits to the JSON files
    // are invisible until restart.
    let store = Arc::new(JsonStore::open(config.storage_root.clone()).await?);
    info!("✓ Loaded record maps from storage root");

    let state = AppState::new(store, config.bot_token.clone());
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("trackstash listening on http://{}", addr);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
