//! Resource Tracker Module
//!
//! Scoped ownership of asynchronous resources: cancellable operations,
//! one-shot timeouts and repeating intervals created during a unit of work
//! are released exactly once when that unit ends.

mod cancel;
mod registry;

pub use cancel::CancelHandle;
pub use registry::{CleanupReport, ResourceTracker, TimerHandle, MIN_INTERVAL_PERIOD};
