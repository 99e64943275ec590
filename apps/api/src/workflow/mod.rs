//! Workflow — fetch postings, score them one by one, persist, notify, log.
//!
//! Flow: trigger (manual or scheduled) → load settings + resume → job search →
//!       scoring pipeline (progress per item, cooperative cancel) →
//!       threshold filter → replace-all persist → conditional email → run history.
//!
//! At most one run is active process-wide. `ProgressTracker` owns that guard.

use std::time::Duration;

use thiserror::Error;

use crate::job_search::SearchError;
use crate::store::StoreError;

pub mod handlers;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{Collaborators, Orchestrator, WorkflowOutcome};
pub use progress::ProgressState;
pub use scheduler::Scheduler;

/// Structural failures that abort a run. Per-posting scoring failures and
/// notification failures never show up here.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("No settings found")]
    ConfigMissing,

    #[error("No resume uploaded")]
    ResumeMissing,

    #[error("Job search failed: {0}")]
    UpstreamSearch(#[from] SearchError),

    #[error("Failed to persist results: {0}")]
    Persistence(StoreError),

    #[error("{operation} timed out after {}s", .limit.as_secs())]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    #[error("A workflow run is already in progress")]
    AlreadyRunning,
}

/// Fixed pacing and timeout knobs. Not user-tunable; tests shorten them.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Result pages requested from the job source.
    pub page_count: u32,
    /// Pause between consecutive scorer calls.
    pub courtesy_delay: Duration,
    pub score_timeout: Duration,
    pub search_timeout: Duration,
    pub store_timeout: Duration,
    pub notify_timeout: Duration,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            page_count: 10,
            courtesy_delay: Duration::from_millis(800),
            score_timeout: Duration::from_secs(30),
            search_timeout: Duration::from_secs(60),
            store_timeout: Duration::from_secs(30),
            notify_timeout: Duration::from_secs(30),
        }
    }
}
