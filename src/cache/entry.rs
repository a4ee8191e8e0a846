//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with its value and freshness metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Moment the entry was written
    pub stored_at: Instant,
    /// Maximum age before the entry is treated as absent
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stored at `now`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            stored_at: now,
            ttl,
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Stale ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// An entry stays readable while its age is less than or equal to its
    /// TTL; it becomes stale only once the age strictly exceeds the TTL.
    pub fn is_stale(&self, now: Instant) -> bool {
        self.age(now) > self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, saturating at zero.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.ttl.saturating_sub(self.age(now))
    }
}
