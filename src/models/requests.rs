//! Request DTOs for the operations API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted configuration key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for storing a configuration value (PUT /config)
#[derive(Debug, Clone, Deserialize)]
pub struct SetConfigRequest {
    /// The configuration key
    pub key: String,
    /// Arbitrary JSON value
    pub value: Value,
    /// Optional TTL override in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetConfigRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.trim().is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }
}

/// Query string for the ranking lookup (GET /ranking?zone=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingQuery {
    #[serde(default)]
    pub zone: Option<String>,
}
