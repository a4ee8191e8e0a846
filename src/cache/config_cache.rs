//! Configuration value cache.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{CacheStats, TtlCache, CONFIG_CACHE_TTL, DEFAULT_MAX_ENTRIES};

/// Cache of configuration values keyed by an opaque string.
///
/// Values are kept as JSON so the contest settings read from the backend
/// (prices, point multipliers, feature toggles) share one instance.
#[derive(Debug)]
pub struct ConfigCache {
    inner: TtlCache<Value>,
}

impl ConfigCache {
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: TtlCache::new(default_ttl, max_entries),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    /// Reads a value and decodes it into `T`.
    ///
    /// A value that does not decode into `T` is reported as absent and left
    /// in place for callers expecting a different shape.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.inner.get(key)?;
        serde_json::from_value(value).ok()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        self.inner.set(key, value, ttl);
    }

    /// Remaining lifetime of a fresh value, without counting as a read.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.inner.ttl_remaining(key)
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.inner.invalidate(key)
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

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(CONFIG_CACHE_TTL, DEFAULT_MAX_ENTRIES)
    }
}
