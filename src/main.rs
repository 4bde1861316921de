//! Mini Cache demo server
//!
//! Serves a time endpoint whose responses are memoized by the cache engine.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::api::create_router;
use mini_cache::http::get_request_key;
use mini_cache::{CacheEngine, Config, FnIdentifier, ResponseCache};

/// Main entry point for the demo server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache engine and start its expiry sweeper
/// 4. Create Axum router with the response cache applied
/// 5. Start HTTP server on configured port
/// 6. On SIGINT/SIGTERM, drain the server and stop the engine
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache demo server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_id={}, max_items={}, size_limit={}B, cleanup_interval={:?}, port={}, response_ttl={}s",
        config.cache.id,
        config.cache.max_items,
        config.cache.size_limit,
        config.cache.cleanup_interval,
        config.server_port,
        config.response_ttl
    );

    let engine = Arc::new(
        CacheEngine::new(config.cache.clone()).context("failed to initialize cache engine")?,
    );
    engine.start().await;

    let identifier = FnIdentifier::new(Duration::from_secs(config.response_ttl), get_request_key);
    let app = create_router(ResponseCache::new(Arc::clone(&engine), identifier));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    engine.stop().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
