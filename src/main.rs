//! Stached - the stache cache daemon
//!
//! Serves one in-memory cache over the JSON RPC interface.

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Context;
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stache::api::{create_router, AppState, SERVICE_NAME};
use stache::{Cache, Config};

/// Main entry point for the cache daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and the router around it
/// 4. Serve until SIGINT/SIGTERM, then drain for at most the shutdown timeout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stache=info,stached=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting stache cache daemon");

    let config = Config::from_env();
    info!(
        "Configuration loaded: addr={}, request_timeout={}s, shutdown_timeout={}s",
        config.socket_addr(),
        config.request_timeout,
        config.shutdown_timeout
    );

    let state = AppState::new(Cache::new());
    let app = create_router(state, config.request_timeout());

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("{} listening on http://{}", SERVICE_NAME, addr);

    let (stop_tx, stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = stop_tx.send(true);
        })
        .into_future();

    tokio::select! {
        result = server => result.context("server error")?,
        _ = drain_deadline(stop_rx, config.shutdown_timeout()) => {
            warn!("In-flight requests did not finish within {:?}, exiting", config.shutdown_timeout());
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves `grace` after shutdown starts; never resolves otherwise.
async fn drain_deadline(mut stop_rx: watch::Receiver<bool>, grace: Duration) {
    if stop_rx.wait_for(|stop| *stop).await.is_err() {
        return std::future::pending().await;
    }
    tokio::time::sleep(grace).await;
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
