//! playgate-server: the token-gated HLS delivery gateway.
//!
//! This crate ties playgate together into a running server. It provides:
//!
//! - Axum-based HTTP routes for manifests and media parts
//! - Stateless playback-token authorization against a rotatable secret
//! - Sanitized path resolution under the per-session storage root
//! - Non-buffering part streaming, including ordered concatenation
//! - Graceful shutdown via signal handling

pub mod context;
pub mod engine;
pub mod error;
pub mod router;
pub mod routes;
pub mod store;
pub mod token;

use std::net::SocketAddr;

use playgate_core::config::Config;
use playgate_core::{Error, Result};

use crate::context::AppContext;

/// Start the playgate gateway.
///
/// This is the main entry point. It validates the configuration,
/// constructs the [`AppContext`], and serves HTTP until a shutdown
/// signal is received. Refuses to start without a signing secret —
/// an unauthenticated gateway must fail closed.
pub async fn start(config: Config) -> Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    if config.playback.token_secret.is_none() {
        return Err(Error::Validation(
            "playback.token_secret must be set (generate one with `playgate generate-secret`)"
                .into(),
        ));
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(config);
    let app = router::build_router(ctx);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received");
}
