//! Background Tasks Module
//!
//! Periodic work that runs while the server is up.
//!
//! # Tasks
//! - Stats reporter: logs cache statistics at a configured interval

mod stats_reporter;

pub use stats_reporter::spawn_stats_reporter;
