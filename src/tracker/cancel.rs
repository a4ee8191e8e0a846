//! Cancellable handle handed out for in-flight operations.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Cancellation signal for one outstanding operation.
///
/// Clones share state: the tracker keeps one clone, the operation awaits
/// [`CancelHandle::cancelled`] on another. The signal is sent at most once,
/// and never after the operation reported completion through
/// [`CancelHandle::finish`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

const RUNNING: u8 = 0;
const CANCELLED: u8 = 1;
const FINISHED: u8 = 2;

/// `phase` leaves `RUNNING` exactly once, to either `CANCELLED` or `FINISHED`.
#[derive(Debug, Default)]
struct CancelState {
    phase: AtomicU8,
    signals: AtomicUsize,
    notify: Notify,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends the cancellation signal.
    ///
    /// Returns `false` without signalling when the handle was already
    /// cancelled or its operation already finished.
    pub fn cancel(&self) -> bool {
        if !self.leave_running(CANCELLED) {
            return false;
        }
        self.state.signals.fetch_add(1, Ordering::AcqRel);
        self.state.notify.notify_waiters();
        true
    }

    /// Marks the operation as completed so later cleanup leaves it alone.
    ///
    /// Returns `false` when the handle was cancelled first.
    pub fn finish(&self) -> bool {
        self.leave_running(FINISHED)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.phase.load(Ordering::Acquire) == CANCELLED
    }

    /// True once the operation either completed or was cancelled.
    pub fn is_finished(&self) -> bool {
        self.state.phase.load(Ordering::Acquire) != RUNNING
    }

    /// Number of cancellation signals sent through this handle (0 or 1).
    pub fn signal_count(&self) -> usize {
        self.state.signals.load(Ordering::Acquire)
    }

    /// Resolves once the handle is cancelled.
    pub async fn cancelled(&self) {
        let notified = self.state.notify.notified();
        tokio::pin!(notified);
        // Register interest before checking the flag so a concurrent cancel
        // cannot slip between the check and the await.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    fn leave_running(&self, next: u8) -> bool {
        self.state
            .phase
            .compare_exchange(RUNNING, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
