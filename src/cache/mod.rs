//! Cache Module
//!
//! In-memory caches with lazy TTL expiry and an LRU size bound.

mod config_cache;
mod entry;
mod lru;
mod ranking_cache;
mod stats;
mod store;


use std::time::Duration;

pub use config_cache::ConfigCache;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use ranking_cache::RankingCache;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Default TTL for configuration values
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default TTL for zone rankings
pub const RANKING_CACHE_TTL: Duration = Duration::from_secs(2 * 60);

/// Bucket used for rankings requested without a zone
pub const ALL_ZONES: &str = "all";

/// Default size bound for each cache instance
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
