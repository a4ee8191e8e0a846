//! API Handlers
//!
//! HTTP request handlers for the operations surface around the caches.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tokio::sync::RwLock;

use crate::cache::{ConfigCache, RankingCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CacheStatsResponse, ConfigValueResponse, HealthResponse, MessageResponse, PurgeResponse,
    RankingQuery, RankingResponse, SetConfigRequest, StatsResponse,
};
use crate::ranking::{RankingService, RankingSource};

/// Application state shared across all handlers.
///
/// Cache instances live here and are handed to every request; there is no
/// global cache.
#[derive(Clone)]
pub struct AppState {
    /// Configuration value cache
    pub config_cache: Arc<RwLock<ConfigCache>>,
    /// Ranking cache with its backend fall-through
    pub rankings: RankingService,
}

impl AppState {
    pub fn new(config_cache: ConfigCache, rankings: RankingService) -> Self {
        Self {
            config_cache: Arc::new(RwLock::new(config_cache)),
            rankings,
        }
    }

    /// Creates the state from configuration, reading rankings from `source`.
    pub fn from_config(config: &Config, source: Arc<dyn RankingSource>) -> Self {
        let config_cache = ConfigCache::new(config.config_cache_ttl(), config.cache_max_entries);
        let ranking_cache =
            RankingCache::new(config.ranking_cache_ttl(), config.cache_max_entries);
        let rankings = RankingService::new(ranking_cache, source, config.fetch_timeout());
        Self::new(config_cache, rankings)
    }
}

/// Handler for GET /ranking?zone=...
pub async fn ranking_handler(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse>> {
    let lookup = state.rankings.lookup(query.zone.as_deref()).await?;

    Ok(Json(RankingResponse {
        zone: lookup.zone,
        cached: lookup.cached,
        teams: lookup.teams,
    }))
}

/// Handler for DELETE /ranking/:zone
pub async fn invalidate_ranking_handler(
    State(state): State<AppState>,
    Path(zone): Path<String>,
) -> Json<MessageResponse> {
    let removed = state.rankings.invalidate(Some(zone.as_str())).await;
    Json(MessageResponse::invalidated(
        RankingCache::bucket(Some(zone.as_str())),
        removed,
    ))
}

/// Handler for DELETE /ranking
pub async fn clear_ranking_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.rankings.clear().await;
    Json(MessageResponse::cleared("ranking"))
}

/// Handler for PUT /config
pub async fn set_config_handler(
    State(state): State<AppState>,
    Json(req): Json<SetConfigRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    let mut cache = state.config_cache.write().await;
    cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(MessageResponse::stored(req.key)))
}

/// Handler for GET /config/:key
pub async fn get_config_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ConfigValueResponse>> {
    // Write lock: an expired read removes the entry
    let mut cache = state.config_cache.write().await;
    let value = cache.get(&key);
    let ttl = cache.ttl_remaining(&key);
    drop(cache);

    match (value, ttl) {
        (Some(value), Some(ttl)) => Ok(Json(ConfigValueResponse::new(key, value, ttl))),
        _ => Err(AppError::NotFound(key)),
    }
}

/// Handler for DELETE /config/:key
pub async fn invalidate_config_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<MessageResponse> {
    let removed = state.config_cache.write().await.invalidate(&key);
    Json(MessageResponse::invalidated(key, removed))
}

/// Handler for DELETE /config
pub async fn clear_config_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.config_cache.write().await.clear();
    Json(MessageResponse::cleared("config"))
}

/// Handler for POST /purge
///
/// Sweeps stale entries out of both caches on demand.
pub async fn purge_handler(State(state): State<AppState>) -> Json<PurgeResponse> {
    let config = state.config_cache.write().await.purge_expired();
    let ranking = state.rankings.purge_expired().await;

    Json(PurgeResponse { config, ranking })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let config = state.config_cache.read().await.stats();
    let ranking = state.rankings.stats().await;

    Json(StatsResponse {
        config: CacheStatsResponse::from(config),
        ranking: CacheStatsResponse::from(ranking),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
