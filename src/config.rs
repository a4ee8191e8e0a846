//! Configuration Module
//!
//! Loads server, cache and backend settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL for configuration values, in milliseconds
    pub config_cache_ttl_ms: u64,
    /// Default TTL for zone rankings, in milliseconds
    pub ranking_cache_ttl_ms: u64,
    /// Size bound applied to each cache instance
    pub cache_max_entries: usize,
    /// Base URL of the hosted backend
    pub backend_url: String,
    /// Anonymous API key sent to the backend
    pub backend_api_key: String,
    /// Table or view holding the ranking rows
    pub ranking_table: String,
    /// Upper bound for one ranking fetch, in milliseconds
    pub fetch_timeout_ms: u64,
    /// Period of the stats report in seconds, 0 disables it
    pub stats_log_interval_secs: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CONFIG_CACHE_TTL_MS` - Configuration cache TTL (default: 300000)
    /// - `RANKING_CACHE_TTL_MS` - Ranking cache TTL (default: 120000)
    /// - `CACHE_MAX_ENTRIES` - Entries per cache (default: 1000)
    /// - `BACKEND_URL` - Backend base URL (default: http://localhost:54321)
    /// - `BACKEND_API_KEY` - Backend API key (default: empty)
    /// - `RANKING_TABLE` - Ranking table or view (default: ranking)
    /// - `FETCH_TIMEOUT_MS` - Ranking fetch timeout (default: 5000)
    /// - `STATS_LOG_INTERVAL_SECS` - Stats report period (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            config_cache_ttl_ms: env_or("CONFIG_CACHE_TTL_MS", defaults.config_cache_ttl_ms),
            ranking_cache_ttl_ms: env_or("RANKING_CACHE_TTL_MS", defaults.ranking_cache_ttl_ms),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            backend_url: env_or("BACKEND_URL", defaults.backend_url),
            backend_api_key: env_or("BACKEND_API_KEY", defaults.backend_api_key),
            ranking_table: env_or("RANKING_TABLE", defaults.ranking_table),
            fetch_timeout_ms: env_or("FETCH_TIMEOUT_MS", defaults.fetch_timeout_ms),
            stats_log_interval_secs: env_or(
                "STATS_LOG_INTERVAL_SECS",
                defaults.stats_log_interval_secs,
            ),
        }
    }

    pub fn config_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.config_cache_ttl_ms)
    }

    pub fn ranking_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.ranking_cache_ttl_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Stats report period, or None when reporting is disabled.
    pub fn stats_log_interval(&self) -> Option<Duration> {
        (self.stats_log_interval_secs > 0)
            .then(|| Duration::from_secs(self.stats_log_interval_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            config_cache_ttl_ms: 300_000,
            ranking_cache_ttl_ms: 120_000,
            cache_max_entries: 1000,
            backend_url: "http://localhost:54321".to_string(),
            backend_api_key: String::new(),
            ranking_table: "ranking".to_string(),
            fetch_timeout_ms: 5000,
            stats_log_interval_secs: 60,
        }
    }
}
