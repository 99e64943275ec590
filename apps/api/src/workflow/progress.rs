//! Progress Tracker — the process-wide run-state snapshot polled by clients.
//!
//! Also the single-flight guard: `try_start` atomically claims the run slot and
//! hands out the only writer (`ActiveRun`). Not persisted; a restart loses it.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub running: bool,
    pub current: usize,
    pub total: usize,
    pub status: String,
    pub cancelled: bool,
}

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The active run will stop at its next checkpoint.
    Requested,
    /// No run is active.
    Idle,
    /// The active run has finished scoring and is saving its results.
    Committed,
}

#[derive(Default)]
struct Inner {
    state: ProgressState,
    /// Present only while a run is active.
    token: Option<CancellationToken>,
    /// Set once the run is past the point where it can be cancelled.
    committed: bool,
}

#[derive(Clone, Default)]
pub struct ProgressTracker {
    inner: Arc<RwLock<Inner>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ProgressState {
        self.inner.read().state.clone()
    }

    /// Claims the run slot. Returns `None` if a run is already active.
    pub fn try_start(&self) -> Option<ActiveRun> {
        let mut inner = self.inner.write();
        if inner.state.running {
            return None;
        }

        let token = CancellationToken::new();
        inner.state = ProgressState {
            running: true,
            current: 0,
            total: 0,
            status: "Starting...".to_string(),
            cancelled: false,
        };
        inner.token = Some(token.clone());
        inner.committed = false;

        Some(ActiveRun {
            tracker: self.clone(),
            token,
            finished: false,
        })
    }

    /// Flags the active run for cancellation. Does nothing when idle or when
    /// the run has already committed to saving its results.
    pub fn cancel(&self) -> CancelOutcome {
        let mut inner = self.inner.write();
        if !inner.state.running {
            return CancelOutcome::Idle;
        }
        if inner.committed {
            return CancelOutcome::Committed;
        }

        inner.state.cancelled = true;
        inner.state.status = "Cancelling...".to_string();
        if let Some(token) = &inner.token {
            token.cancel();
        }
        CancelOutcome::Requested
    }
}

/// Write handle for the one active run. Dropping it without `finish` still
/// releases the slot, so `running` can never stay stuck at `true`.
pub struct ActiveRun {
    tracker: ProgressTracker,
    token: CancellationToken,
    finished: bool,
}

impl ActiveRun {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Closes the cancellation window. Returns `false` if a cancel request
    /// got in first, in which case the run must stop.
    pub fn commit(&self) -> bool {
        let mut inner = self.tracker.inner.write();
        if inner.state.cancelled {
            return false;
        }
        inner.committed = true;
        true
    }

    /// Status text is left alone once cancellation has been requested.
    pub fn set_status(&self, status: impl Into<String>) {
        let mut inner = self.tracker.inner.write();
        if !inner.state.cancelled {
            inner.state.status = status.into();
        }
    }

    pub fn set_total(&self, total: usize) {
        self.tracker.inner.write().state.total = total;
    }

    /// Records that item `current` of `total` is being processed.
    /// `current` never moves backwards within a run.
    pub fn advance(&self, current: usize, total: usize, status: impl Into<String>) {
        let mut inner = self.tracker.inner.write();
        inner.state.current = inner.state.current.max(current);
        inner.state.total = total;
        if !inner.state.cancelled {
            inner.state.status = status.into();
        }
    }

    /// Ends the run with a final status and frees the slot.
    pub fn finish(mut self, status: impl Into<String>) {
        self.release(status.into());
    }

    fn release(&mut self, status: String) {
        if self.finished {
            return;
        }
        self.finished = true;

        let mut inner = self.tracker.inner.write();
        inner.state.running = false;
        inner.state.status = status;
        inner.token = None;
        inner.committed = false;
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.release("Interrupted".to_string());
    }
}
