//! Cache-first ranking lookups.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, RankingCache, ALL_ZONES};
use crate::error::{AppError, Result};
use crate::models::TeamRanking;
use crate::ranking::RankingSource;
use crate::tracker::ResourceTracker;

/// Outcome of a ranking lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingLookup {
    /// Bucket the lookup resolved to
    pub zone: String,
    /// Whether the teams came from the cache
    pub cached: bool,
    pub teams: Vec<TeamRanking>,
}

/// Serves rankings from the cache and falls through to the source on a miss.
///
/// Only successful fetches are written back; a failed or timed-out fetch
/// leaves the cache untouched so the next request retries the source.
#[derive(Clone)]
pub struct RankingService {
    cache: Arc<RwLock<RankingCache>>,
    source: Arc<dyn RankingSource>,
    fetch_timeout: Duration,
}

impl RankingService {
    pub fn new(
        cache: RankingCache,
        source: Arc<dyn RankingSource>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            source,
            fetch_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<RwLock<RankingCache>> {
        &self.cache
    }

    pub async fn lookup(&self, zone: Option<&str>) -> Result<RankingLookup> {
        let bucket = RankingCache::bucket(zone).to_string();

        let cached = self.cache.write().await.get(Some(bucket.as_str()));
        if let Some(teams) = cached {
            debug!(zone = %bucket, "ranking served from cache");
            return Ok(RankingLookup {
                zone: bucket,
                cached: true,
                teams,
            });
        }

        let teams = self.fetch(&bucket).await?;
        self.cache
            .write()
            .await
            .set(Some(bucket.as_str()), teams.clone(), None);
        info!(zone = %bucket, teams = teams.len(), "ranking fetched from backend");

        Ok(RankingLookup {
            zone: bucket,
            cached: false,
            teams,
        })
    }

    pub async fn invalidate(&self, zone: Option<&str>) -> bool {
        self.cache.write().await.invalidate(zone)
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    /// Drops every stale zone bucket and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.cache.write().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// One backend fetch as a unit of work: the request is tracked as a
    /// cancellable and a tracked timeout cancels it after `fetch_timeout`.
    async fn fetch(&self, bucket: &str) -> Result<Vec<TeamRanking>> {
        let tracker = ResourceTracker::new(format!("ranking:{}", bucket));
        let request = tracker.track_cancelable();
        let on_timeout = request.clone();
        tracker.track_timeout(
            move || {
                on_timeout.cancel();
            },
            self.fetch_timeout,
        );

        let zone = (bucket != ALL_ZONES).then_some(bucket);
        let outcome = tokio::select! {
            result = self.source.fetch_ranking(zone) => result,
            _ = request.cancelled() => Err(AppError::Timeout(format!(
                "ranking for zone '{}' not received within {}ms",
                bucket,
                self.fetch_timeout.as_millis()
            ))),
        };
        request.finish();
        tracker.cleanup();

        if let Err(err) = &outcome {
            warn!(zone = %bucket, error = %err, "ranking fetch failed");
        }
        outcome
    }
}
