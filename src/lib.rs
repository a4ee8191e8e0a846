//! Super Ganaderia - caching and resource tracking core
//!
//! TTL caches for configuration values and zone rankings, plus a scoped
//! tracker that releases cancellable operations and timers exactly once.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod ranking;
pub mod tasks;
pub mod tracker;

pub use api::AppState;
pub use config::Config;
pub use tracker::ResourceTracker;
