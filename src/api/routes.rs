//! API Routes
//!
//! Configures the Axum router for the operations surface.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_config_handler, clear_ranking_handler, get_config_handler, health_handler,
    invalidate_config_handler, invalidate_ranking_handler, purge_handler, ranking_handler,
    set_config_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /ranking?zone=` - Cache-first ranking lookup
/// - `DELETE /ranking/:zone` - Invalidate one zone bucket
/// - `DELETE /ranking` - Clear the ranking cache
/// - `PUT /config` - Store a configuration value
/// - `GET /config/:key` - Read a configuration value
/// - `DELETE /config/:key` - Invalidate a configuration value
/// - `DELETE /config` - Clear the configuration cache
/// - `POST /purge` - Sweep stale entries out of both caches
/// - `GET /stats` - Statistics for both caches
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ranking", get(ranking_handler).delete(clear_ranking_handler))
        .route("/ranking/:zone", delete(invalidate_ranking_handler))
        .route("/config", put(set_config_handler).delete(clear_config_handler))
        .route(
            "/config/:key",
            get(get_config_handler).delete(invalidate_config_handler),
        )
        .route("/purge", post(purge_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
