//! Response DTOs for the operations API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::models::TeamRanking;

/// Response body for the ranking lookup (GET /ranking)
#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    /// Bucket that was read (`"all"` when no zone was supplied)
    pub zone: String,
    /// Whether the ranking came from the cache
    pub cached: bool,
    pub teams: Vec<TeamRanking>,
}

/// Response body for a configuration read (GET /config/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValueResponse {
    pub key: String,
    pub value: Value,
    /// Milliseconds until the value expires
    pub ttl_remaining_ms: u64,
}

impl ConfigValueResponse {
    pub fn new(key: impl Into<String>, value: Value, ttl_remaining: Duration) -> Self {
        Self {
            key: key.into(),
            value,
            ttl_remaining_ms: u64::try_from(ttl_remaining.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Response body for writes, invalidations and clears
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human readable outcome
    pub message: String,
    /// Key or bucket affected, absent for a full clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl MessageResponse {
    pub fn stored(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key: Some(key),
        }
    }

    pub fn invalidated(key: impl Into<String>, removed: bool) -> Self {
        let key = key.into();
        let message = if removed {
            format!("Key '{}' invalidated", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            key: Some(key),
        }
    }

    pub fn cleared(cache: &str) -> Self {
        Self {
            message: format!("{} cache cleared", cache),
            key: None,
        }
    }
}

/// Response body for a manual sweep (POST /purge)
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Stale configuration values removed
    pub config: usize,
    /// Stale zone buckets removed
    pub ranking: usize,
}

/// Statistics for one cache instance
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub config: CacheStatsResponse,
    pub ranking: CacheStatsResponse,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_response_serialize() {
        let resp = RankingResponse {
            zone: "norte".to_string(),
            cached: true,
            teams: vec![TeamRanking::new("X", 10)],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["zone"], "norte");
        assert_eq!(json["cached"], true);
        assert_eq!(json["teams"][0]["points"], 10);
    }

    #[test]
    fn test_config_value_response_reports_ttl_in_millis() {
        let resp = ConfigValueResponse::new("banner", Value::Bool(true), Duration::from_secs(6));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ttl_remaining_ms"], 6000);

        let forever = ConfigValueResponse::new("k", Value::Null, Duration::MAX);
        assert_eq!(forever.ttl_remaining_ms, u64::MAX);
    }

    #[test]
    fn test_invalidate_messages() {
        assert!(MessageResponse::invalidated("k", true)
            .message
            .contains("invalidated"));
        assert!(MessageResponse::invalidated("k", false)
            .message
            .contains("not cached"));

        let cleared = serde_json::to_string(&MessageResponse::cleared("ranking")).unwrap();
        assert!(!cleared.contains("\"key\""));
    }

    #[test]
    fn test_cache_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            expirations: 3,
            evictions: 5,
            total_entries: 100,
        };
        let resp = CacheStatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expirations, 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
