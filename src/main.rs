//! Super Ganaderia - operations server
//!
//! Serves ranking lookups and cache administration over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super_ganaderia::api::create_router;
use super_ganaderia::ranking::RestRankingSource;
use super_ganaderia::tasks::spawn_stats_reporter;
use super_ganaderia::{AppState, Config, ResourceTracker};

/// Main entry point for the operations server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the caches and the backend ranking source
/// 4. Register the stats reporter on the server's resource tracker
/// 5. Start HTTP server on configured port
/// 6. Release tracked resources on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "super_ganaderia=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Super Ganaderia operations server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: config_ttl={}ms, ranking_ttl={}ms, max_entries={}, port={}, backend={}",
        config.config_cache_ttl_ms,
        config.ranking_cache_ttl_ms,
        config.cache_max_entries,
        config.server_port,
        config.backend_url
    );

    let source = RestRankingSource::from_config(&config)
        .context("failed to create ranking backend client")?;
    let state = AppState::from_config(&config, Arc::new(source));
    info!("Caches initialized");

    let tracker = ResourceTracker::new("server");
    if let Some(period) = config.stats_log_interval() {
        spawn_stats_reporter(&tracker, state.clone(), period);
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tracker))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then releases everything
/// the server tracker owns.
async fn shutdown_signal(tracker: ResourceTracker) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    let report = tracker.cleanup();
    info!(
        intervals = report.intervals_stopped,
        timers = report.timers_cleared,
        "Background work stopped"
    );
}
