//! # Mistake Tracker Binary
//!
//! The entry point that assembles settings, logging, the store handle and the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use mt_api::{configure_routes, AppState};
use mt_config::{LogSettings, Settings};
use mt_store_json::JsonMistakeStore;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log);
    if let Some(path) = &settings.env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    // 1. Open the backing document (creates the data directory if needed)
    let store = JsonMistakeStore::open(&settings.storage.data_file)
        .await
        .with_context(|| {
            format!(
                "failed to prepare data directory for {}",
                settings.storage.data_file.display()
            )
        })?;
    tracing::info!(path = %store.path().display(), "mistake store ready");

    // 2. Wrap in AppState (dynamic dispatch keeps the store pluggable)
    let state = AppState::new(Arc::new(store));
    let app = configure_routes(
        state,
        &settings.ui.static_dir,
        settings.server.max_body_bytes,
    );

    // 3. Serve
    let addr = settings.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Mistake Tracker starting on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
