//! Orchestrator — one end-to-end run: settings, resume, search, scoring,
//! persistence, notification, run history.
//!
//! Cancellation is honoured until scoring ends. After that the run commits
//! and finishes its saves even if a cancel request arrives.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::job_search::JobSource;
use crate::matching::scorer::MatchScorer;
use crate::models::job_match::MatchResult;
use crate::models::run::RunRecord;
use crate::models::settings::RunConfig;
use crate::notify::Notifier;
use crate::store::{ConfigProvider, ResultStore, ResumeProvider, StoreError};
use crate::workflow::pipeline::ScoringPipeline;
use crate::workflow::progress::{ActiveRun, CancelOutcome, ProgressState, ProgressTracker};
use crate::workflow::{WorkflowError, WorkflowOptions};

/// Everything a run talks to. All seams are trait objects so tests can swap them.
#[derive(Clone)]
pub struct Collaborators {
    pub config: Arc<dyn ConfigProvider>,
    pub resumes: Arc<dyn ResumeProvider>,
    pub jobs: Arc<dyn JobSource>,
    pub scorer: Arc<dyn MatchScorer>,
    pub store: Arc<dyn ResultStore>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub jobs_found: usize,
    pub jobs_matched: usize,
    pub email_sent: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Success(RunSummary),
    /// Stopped at a cancel request. Nothing was persisted or sent.
    Cancelled,
}

/// Runs the end-to-end workflow. One instance per process; manual triggers
/// and the scheduler share it so single-flight holds across both.
pub struct Orchestrator {
    deps: Collaborators,
    progress: ProgressTracker,
    options: WorkflowOptions,
}

impl Orchestrator {
    pub fn new(deps: Collaborators, options: WorkflowOptions) -> Self {
        Self {
            deps,
            progress: ProgressTracker::new(),
            options,
        }
    }

    pub fn progress(&self) -> ProgressState {
        self.progress.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn tracker(&self) -> &ProgressTracker {
        &self.progress
    }

    /// Requests cancellation of the active run.
    pub fn cancel(&self) -> CancelOutcome {
        let outcome = self.progress.cancel();
        match outcome {
            CancelOutcome::Requested => info!("Cancel requested"),
            CancelOutcome::Committed => info!("Cancel ignored: run is already saving results"),
            CancelOutcome::Idle => {}
        }
        outcome
    }

    /// Executes one run. Rejected with `AlreadyRunning` if another run holds
    /// the slot; a rejected trigger leaves no trace in run history.
    pub async fn run_workflow(&self) -> Result<WorkflowOutcome, WorkflowError> {
        let Some(run) = self.progress.try_start() else {
            warn!("Workflow trigger rejected: a run is already in progress");
            return Err(WorkflowError::AlreadyRunning);
        };

        let run_id = Uuid::new_v4();
        self.run_and_record(run)
            .instrument(info_span!("workflow", %run_id))
            .await
    }

    async fn run_and_record(&self, run: ActiveRun) -> Result<WorkflowOutcome, WorkflowError> {
        info!("Starting workflow");

        match self.execute(&run).await {
            Ok(Some(summary)) => {
                info!("Workflow complete: {}", summary.message);
                run.finish("Complete");
                Ok(WorkflowOutcome::Success(summary))
            }
            Ok(None) => {
                info!("Workflow cancelled");
                run.finish("Cancelled");
                Ok(WorkflowOutcome::Cancelled)
            }
            Err(err) => {
                error!("Workflow error: {err}");
                let record = RunRecord::error(err.to_string());
                match bounded(
                    "run record",
                    self.options.store_timeout,
                    self.deps.store.append_run_record(&record),
                )
                .await
                {
                    Ok(Ok(())) => {}
                    Ok(Err(store_err)) => error!("Failed to record run error: {store_err}"),
                    Err(timeout) => error!("Failed to record run error: {timeout}"),
                }
                run.finish(format!("Error: {err}"));
                Err(err)
            }
        }
    }

    /// `Ok(None)` means the run was cancelled during scoring.
    async fn execute(&self, run: &ActiveRun) -> Result<Option<RunSummary>, WorkflowError> {
        let options = &self.options;

        run.set_status("Loading settings...");
        let config = bounded("load settings", options.store_timeout, self.deps.config.current())
            .await?
            .map_err(|e| missing_or(e, WorkflowError::ConfigMissing))?;

        run.set_status("Loading resume...");
        let resume = bounded("load resume", options.store_timeout, self.deps.resumes.latest())
            .await?
            .map_err(|e| missing_or(e, WorkflowError::ResumeMissing))?;

        run.set_status("Searching for jobs...");
        info!("Searching for: {}", config.job_query);
        let postings = bounded(
            "job search",
            options.search_timeout,
            self.deps.jobs.search(&config.job_query, options.page_count),
        )
        .await??;

        let jobs_found = postings.len();
        let limit = effective_limit(jobs_found, config.job_limit);
        run.set_total(limit);
        info!("Found {jobs_found} jobs, analyzing {limit}");

        let pipeline = ScoringPipeline::new(
            self.deps.scorer.as_ref(),
            options.courtesy_delay,
            options.score_timeout,
        );
        let outcome = pipeline
            .run(&postings[..limit], &resume, config.expected_salary, run)
            .await;
        // A cancel racing the end of scoring is resolved here, under the
        // tracker lock: either it wins and nothing is saved, or it is refused.
        if outcome.cancelled || !run.commit() {
            return Ok(None);
        }

        run.set_status("Filtering results...");
        let good = good_matches(&outcome.results, config.match_threshold);
        let scored = outcome.results.len();
        info!(
            "{} of {scored} jobs meet threshold of {}",
            good.len(),
            config.match_threshold
        );

        // The full set is persisted, including sub-threshold and degraded entries.
        run.set_status("Saving results...");
        bounded(
            "save results",
            options.store_timeout,
            self.deps.store.replace_all(&outcome.results),
        )
        .await?
        .map_err(WorkflowError::Persistence)?;

        let email_sent = self.notify(run, &config, &good).await;

        let record = RunRecord::success(jobs_found, good.len(), email_sent);
        bounded(
            "run record",
            options.store_timeout,
            self.deps.store.append_run_record(&record),
        )
        .await?
        .map_err(WorkflowError::Persistence)?;

        Ok(Some(RunSummary {
            jobs_found,
            jobs_matched: good.len(),
            email_sent,
            message: summary_message(good.len(), scored, config.match_threshold, email_sent),
        }))
    }

    /// Sends the good-match email. Failures are logged and reported as `false`.
    async fn notify(&self, run: &ActiveRun, config: &RunConfig, good: &[MatchResult]) -> bool {
        if good.is_empty() {
            info!(
                "No jobs meet threshold of {}, email not sent",
                config.match_threshold
            );
            return false;
        }

        run.set_status("Sending email...");
        let send = self
            .deps
            .notifier
            .send(&config.recipient, good, config.match_threshold);

        match tokio::time::timeout(self.options.notify_timeout, send).await {
            Ok(Ok(())) => {
                info!("Email sent with {} matches", good.len());
                true
            }
            Ok(Err(err)) => {
                warn!("Email failed: {err}");
                false
            }
            Err(_) => {
                warn!(
                    "Email timed out after {}s",
                    self.options.notify_timeout.as_secs()
                );
                false
            }
        }
    }
}

/// Number of postings a run scores.
pub fn effective_limit(found: usize, job_limit: usize) -> usize {
    found.min(job_limit)
}

/// Results at or above the threshold, in input order.
pub fn good_matches(results: &[MatchResult], threshold: u8) -> Vec<MatchResult> {
    results
        .iter()
        .filter(|r| r.meets_threshold(threshold))
        .cloned()
        .collect()
}

fn summary_message(good: usize, scored: usize, threshold: u8, email_sent: bool) -> String {
    if email_sent {
        format!("Email sent! {good}/{scored} jobs matched (score ≥ {threshold})")
    } else {
        format!("Done. {good}/{scored} jobs match threshold of {threshold}. No email sent.")
    }
}

fn missing_or(err: StoreError, missing: WorkflowError) -> WorkflowError {
    match err {
        StoreError::NotFound(_) => missing,
        other => WorkflowError::Persistence(other),
    }
}

async fn bounded<F, T, E>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<Result<T, E>, WorkflowError>
where
    F: Future<Output = Result<T, E>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| WorkflowError::Timeout { operation, limit })
}
