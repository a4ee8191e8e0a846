//! TTL Cache Store Module
//!
//! Generic cache engine combining HashMap storage with lazy TTL expiry and an
//! LRU size bound.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == TTL Cache ==
/// In-memory key-value cache with per-entry time-to-live.
///
/// Staleness is only checked when a key is read: a read that finds a stale
/// entry deletes it and reports a miss. Nothing runs in the background.
/// When the cache holds `max_entries` keys, a new key first displaces any
/// stale entries and then, if still full, the least recently used one.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used by `set` when no override is supplied
    /// * `max_entries` - Size bound, clamped to at least one entry
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not stale.
    ///
    /// A stale entry is removed as a side effect of this call.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let stale = match self.entries.get(key) {
            Some(entry) => entry.is_stale(now),
            None => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                return None;
            }
        };

        if stale {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "cache entry expired");
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == TTL Remaining ==
    /// Remaining lifetime of a fresh entry.
    ///
    /// Does not touch statistics, recency or storage; a stale entry is
    /// reported as absent and left for the next read to remove.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.ttl_remaining_at(key, Instant::now())
    }

    pub(crate) fn ttl_remaining_at(&self, key: &str, now: Instant) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_stale(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    // == Set ==
    /// Stores or overwrites `key`, resetting its age to zero.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Per-write TTL override (uses the default TTL if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.set_at(key.into(), value, ttl, Instant::now());
    }

    pub(crate) fn set_at(&mut self, key: String, value: V, ttl: Option<Duration>, now: Instant) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.make_room(now);
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Invalidate ==
    /// Removes a single entry. Returns whether one was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key);
        if removed {
            debug!(key, "cache entry invalidated");
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes every stale entry and returns how many were dropped.
    ///
    /// Only runs when a caller asks for it; expiry otherwise happens on read.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub(crate) fn purge_expired_at(&mut self, now: Instant) -> usize {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_stale(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.remove_entry(key);
        }
        self.stats.record_expirations(stale.len());
        stale.len()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&mut self, now: Instant) {
        if self.purge_expired_at(now) > 0 && self.entries.len() < self.max_entries {
            return;
        }
        if let Some(evicted) = self.lru.evict_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "cache entry evicted");
        }
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}
