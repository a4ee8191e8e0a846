//! API Module
//!
//! HTTP handlers and routing for the operations surface: ranking lookups,
//! configuration values, cache invalidation, statistics and health.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
