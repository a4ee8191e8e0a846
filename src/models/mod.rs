//! Data models
//!
//! Ranking rows shared with the backend, plus the DTOs used to
//! serialize/deserialize HTTP request and response bodies.

pub mod ranking;
pub mod requests;
pub mod responses;

pub use ranking::TeamRanking;
pub use requests::{RankingQuery, SetConfigRequest};
pub use responses::{
    CacheStatsResponse, ConfigValueResponse, ErrorResponse, HealthResponse, MessageResponse,
    PurgeResponse, RankingResponse, StatsResponse,
};
