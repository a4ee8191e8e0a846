//! Ranking-by-zone cache.

use std::time::Duration;

use crate::cache::{CacheStats, TtlCache, ALL_ZONES, DEFAULT_MAX_ENTRIES, RANKING_CACHE_TTL};
use crate::models::TeamRanking;

/// Cache of team rankings keyed by zone.
///
/// A missing or blank zone reads and writes the `"all"` bucket, which holds
/// the contest-wide ranking.
#[derive(Debug)]
pub struct RankingCache {
    inner: TtlCache<Vec<TeamRanking>>,
}

impl RankingCache {
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: TtlCache::new(default_ttl, max_entries),
        }
    }

    /// Resolves the bucket a zone argument maps to.
    pub fn bucket(zone: Option<&str>) -> &str {
        match zone.map(str::trim) {
            Some(zone) if !zone.is_empty() => zone,
            _ => ALL_ZONES,
        }
    }

    pub fn get(&mut self, zone: Option<&str>) -> Option<Vec<TeamRanking>> {
        self.inner.get(Self::bucket(zone))
    }

    pub fn set(&mut self, zone: Option<&str>, teams: Vec<TeamRanking>, ttl: Option<Duration>) {
        self.inner.set(Self::bucket(zone), teams, ttl);
    }

    /// Drops one zone bucket, leaving the others readable.
    pub fn invalidate(&mut self, zone: Option<&str>) -> bool {
        self.inner.invalidate(Self::bucket(zone))
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn purge_expired(&mut self) -> usize {
        self.inner.purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for RankingCache {
    fn default() -> Self {
        Self::new(RANKING_CACHE_TTL, DEFAULT_MAX_ENTRIES)
    }
}
