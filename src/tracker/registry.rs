//! Resource Tracker
//!
//! Owns every cancellable, timeout and interval created during one unit of
//! work and releases all of them exactly once when that unit ends.

use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::tracker::CancelHandle;

/// Shortest period an interval may tick at.
pub const MIN_INTERVAL_PERIOD: Duration = Duration::from_millis(1);

/// First tick used when `now + period` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Default)]
struct Registries {
    next_id: u64,
    closed: bool,
    cancelables: HashMap<u64, CancelHandle>,
    timers: HashMap<u64, JoinHandle<()>>,
    intervals: HashMap<u64, JoinHandle<()>>,
}

impl Registries {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn scheduled(&mut self, kind: TimerKind) -> &mut HashMap<u64, JoinHandle<()>> {
        match kind {
            TimerKind::Timeout => &mut self.timers,
            TimerKind::Interval => &mut self.intervals,
        }
    }
}

fn lock(registries: &Mutex<Registries>) -> MutexGuard<'_, Registries> {
    registries.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_registered(registries: &Weak<Mutex<Registries>>, kind: TimerKind, id: u64) -> bool {
    let Some(registries) = registries.upgrade() else {
        return false;
    };
    let mut guard = lock(&registries);
    guard.scheduled(kind).contains_key(&id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Timeout,
    Interval,
}

// == Timer Handle ==
/// Handle to a timeout or interval scheduled through a [`ResourceTracker`].
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    kind: TimerKind,
    registries: Weak<Mutex<Registries>>,
}

impl TimerHandle {
    /// Cancels this timer or interval ahead of the tracker's cleanup.
    ///
    /// Returns `false` when it already fired, was cancelled, or was cleaned up.
    pub fn cancel(&self) -> bool {
        let Some(registries) = self.registries.upgrade() else {
            return false;
        };
        let task = lock(&registries).scheduled(self.kind).remove(&self.id);
        match task {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// True while the timer is registered and has not fired.
    pub fn is_pending(&self) -> bool {
        is_registered(&self.registries, self.kind, self.id)
    }
}

// == Cleanup Report ==
/// What a single [`ResourceTracker::cleanup`] call released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Cancellables that were still running and received the signal
    pub cancelled: usize,
    /// Timeouts stopped before they fired
    pub timers_cleared: usize,
    /// Intervals stopped
    pub intervals_stopped: usize,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.cancelled == 0 && self.timers_cleared == 0 && self.intervals_stopped == 0
    }
}

// == Resource Tracker ==
/// Registry of the asynchronous resources owned by one unit of work.
///
/// Timers and intervals run as tokio tasks; scheduling one outside a tokio
/// runtime panics. A tracker is not meant to be shared or reused: after
/// [`cleanup`](Self::cleanup) new cancellables come back already cancelled
/// and new timers are never scheduled. Dropping the tracker runs `cleanup`.
#[derive(Debug)]
pub struct ResourceTracker {
    label: String,
    registries: Arc<Mutex<Registries>>,
}

impl ResourceTracker {
    /// Creates an empty tracker. `label` names the unit of work in logs.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            registries: Arc::new(Mutex::new(Registries::default())),
        }
    }

    // == Track Cancelable ==
    /// Creates and registers a cancellation signal for an outstanding operation.
    pub fn track_cancelable(&self) -> CancelHandle {
        let handle = CancelHandle::new();
        let mut registries = lock(&self.registries);
        if registries.closed {
            drop(registries);
            warn!(tracker = %self.label, "cancellable tracked after cleanup");
            handle.cancel();
            return handle;
        }
        let id = registries.allocate_id();
        registries.cancelables.insert(id, handle.clone());
        handle
    }

    // == Track Timeout ==
    /// Runs `callback` once after `delay`.
    ///
    /// The timer leaves the registry before `callback` runs, so a fired timer
    /// is never cancelled by a later cleanup.
    pub fn track_timeout<F>(&self, callback: F, delay: Duration) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let mut registries = lock(&self.registries);
        let id = registries.allocate_id();
        let handle = self.timer_handle(id, TimerKind::Timeout);
        if registries.closed {
            drop(registries);
            warn!(tracker = %self.label, "timeout tracked after cleanup");
            return handle;
        }

        let weak = Arc::downgrade(&self.registries);
        // The registry lock is held until the task is inserted, so the task
        // cannot look itself up before it is registered.
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(registries) = weak.upgrade() else {
                return;
            };
            let still_registered = lock(&registries).timers.remove(&id).is_some();
            drop(registries);
            if still_registered {
                callback();
            }
        });
        registries.timers.insert(id, task);
        handle
    }

    // == Track Interval ==
    /// Runs `callback` every `period` until cleaned up.
    ///
    /// The first run happens one `period` after scheduling. Periods shorter
    /// than [`MIN_INTERVAL_PERIOD`] are raised to it; periods too long to
    /// represent as a deadline never tick.
    pub fn track_interval<F>(&self, mut callback: F, period: Duration) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(MIN_INTERVAL_PERIOD);
        let mut registries = lock(&self.registries);
        let id = registries.allocate_id();
        let handle = self.timer_handle(id, TimerKind::Interval);
        if registries.closed {
            drop(registries);
            warn!(tracker = %self.label, "interval tracked after cleanup");
            return handle;
        }

        let weak = Arc::downgrade(&self.registries);
        let task = tokio::spawn(async move {
            let now = Instant::now();
            let start = now
                .checked_add(period)
                .unwrap_or_else(|| now + FAR_FUTURE);
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !is_registered(&weak, TimerKind::Interval, id) {
                    return;
                }
                callback();
            }
        });
        registries.intervals.insert(id, task);
        handle
    }

    // == Cleanup ==
    /// Releases every tracked resource and empties the registries.
    ///
    /// Unfinished cancellables are signalled, pending timeouts are stopped
    /// before they fire, and intervals are stopped. Calling it again finds
    /// empty registries and releases nothing.
    pub fn cleanup(&self) -> CleanupReport {
        let (cancelables, timers, intervals) = {
            let mut registries = lock(&self.registries);
            registries.closed = true;
            (
                mem::take(&mut registries.cancelables),
                mem::take(&mut registries.timers),
                mem::take(&mut registries.intervals),
            )
        };

        let mut report = CleanupReport::default();
        for handle in cancelables.into_values() {
            if !handle.is_finished() && handle.cancel() {
                report.cancelled += 1;
            }
        }
        for task in timers.into_values() {
            task.abort();
            report.timers_cleared += 1;
        }
        for task in intervals.into_values() {
            task.abort();
            report.intervals_stopped += 1;
        }

        if !report.is_empty() {
            debug!(
                tracker = %self.label,
                cancelled = report.cancelled,
                timers = report.timers_cleared,
                intervals = report.intervals_stopped,
                "tracked resources released"
            );
        }
        report
    }

    pub fn pending_cancelables(&self) -> usize {
        lock(&self.registries).cancelables.len()
    }

    pub fn pending_timers(&self) -> usize {
        lock(&self.registries).timers.len()
    }

    pub fn pending_intervals(&self) -> usize {
        lock(&self.registries).intervals.len()
    }

    fn timer_handle(&self, id: u64, kind: TimerKind) -> TimerHandle {
        TimerHandle {
            id,
            kind,
            registries: Arc::downgrade(&self.registries),
        }
    }
}

impl Drop for ResourceTracker {
    fn drop(&mut self) {
        self.cleanup();
    }
}
