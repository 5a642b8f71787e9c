use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::{error, info};

use super::{
    services::{download, health, instagram_profile, metrics},
    state::{AnyError, AppState},
};
use crate::config::Config;

/// All routes over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/download", post(download))
        .route("/api/instagram-profile", post(instagram_profile))
        .route("/operators/health", get(health))
        .route("/operators/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
        // Transparently decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(config: Config, address: SocketAddr) -> Result<(), AnyError> {
    let state = AppState::from_config(config)?;
    info!(
        platforms = state.downloader.registry().platforms().len(),
        profile_lookup = state.profiles.is_configured(),
        "Application state ready"
    );

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "mediagrab API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
