//! Cache Stats Reporter
//!
//! Periodically logs hit rates and entry counts of both caches. Runs as an
//! interval owned by a `ResourceTracker`, so stopping it is the tracker's job.

use std::time::Duration;

use tracing::{debug, info};

use crate::api::AppState;
use crate::tracker::{ResourceTracker, TimerHandle};

/// Registers the stats report on `tracker`, running every `period`.
///
/// # Example
/// ```ignore
/// let tracker = ResourceTracker::new("server");
/// spawn_stats_reporter(&tracker, state.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// tracker.cleanup();
/// ```
pub fn spawn_stats_reporter(
    tracker: &ResourceTracker,
    state: AppState,
    period: Duration,
) -> TimerHandle {
    info!("Starting cache stats reporter every {} seconds", period.as_secs());
    tracker.track_interval(
        move || {
            report_stats(&state);
        },
        period,
    )
}

/// Logs one report. Returns false when a cache was locked and the report
/// was skipped.
fn report_stats(state: &AppState) -> bool {
    let config = state.config_cache.try_read();
    let ranking = state.rankings.cache().try_read();

    match (config, ranking) {
        (Ok(config), Ok(ranking)) => {
            let config = config.stats();
            let ranking = ranking.stats();
            info!(
                config_entries = config.total_entries,
                config_hit_rate = config.hit_rate(),
                ranking_entries = ranking.total_entries,
                ranking_hit_rate = ranking.hit_rate(),
                ranking_expirations = ranking.expirations,
                "cache stats"
            );
            true
        }
        _ => {
            debug!("cache stats report skipped: cache busy");
            false
        }
    }
}
