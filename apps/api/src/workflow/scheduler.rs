//! Hourly trigger for the workflow.
//!
//! `start` and `stop` are idempotent. The armed state follows `auto_run`:
//! call `sync` at startup and after every settings change.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::workflow::{Orchestrator, WorkflowError, WorkflowOutcome};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60 * 60);

pub struct Scheduler {
    orchestrator: Arc<Orchestrator>,
    period: Duration,
    /// Present while the periodic task is armed.
    armed: Mutex<Option<CancellationToken>>,
}

impl Scheduler {
    pub fn new(orchestrator: Arc<Orchestrator>, period: Duration) -> Self {
        Self {
            orchestrator,
            period,
            armed: Mutex::new(None),
        }
    }

    /// Arms the periodic trigger. Returns `false` if it was already armed.
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut armed = self.armed.lock();
        if armed.is_some() {
            debug!("Scheduler already running");
            return false;
        }

        let token = CancellationToken::new();
        tokio::spawn(
            run_schedule(self.orchestrator.clone(), self.period, token.clone())
                .instrument(info_span!("scheduler")),
        );
        *armed = Some(token);

        info!("Scheduler started (every {}s)", self.period.as_secs());
        true
    }

    /// Disarms the trigger. A run already in flight is left to finish.
    /// Returns `false` if it was not armed.
    pub fn stop(&self) -> bool {
        match self.armed.lock().take() {
            Some(token) => {
                token.cancel();
                info!("Scheduler stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.lock().is_some()
    }

    /// Brings the armed state in line with the configured `auto_run` flag.
    pub fn sync(&self, auto_run: bool) {
        if auto_run {
            self.start();
        } else {
            self.stop();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_schedule(orchestrator: Arc<Orchestrator>, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Schedule loop exiting");
                break;
            }
            _ = ticker.tick() => {}
        }

        info!("Scheduled run starting");
        match orchestrator.run_workflow().await {
            Ok(WorkflowOutcome::Success(summary)) => {
                info!("Scheduled run finished: {}", summary.message)
            }
            Ok(WorkflowOutcome::Cancelled) => info!("Scheduled run cancelled"),
            Err(WorkflowError::AlreadyRunning) => {
                warn!("Skipping scheduled run: a run is already in progress")
            }
            Err(err) => error!("Scheduled run failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run::RunStatus;
    use crate::workflow::testing::{posting, run_config, HarnessBuilder};

    const HOUR: Duration = DEFAULT_PERIOD;

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![]).build();
        let scheduler = Scheduler::new(h.orchestrator.clone(), HOUR);

        assert!(!scheduler.is_armed());
        assert!(scheduler.start());
        assert!(!scheduler.start());
        assert!(scheduler.is_armed());

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert!(!scheduler.is_armed());
    }

    #[tokio::test]
    async fn test_panic_while_locked_does_not_wedge_scheduler() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![]).build();
        let scheduler = Arc::new(Scheduler::new(h.orchestrator.clone(), HOUR));

        let held = scheduler.clone();
        let joined = std::thread::spawn(move || {
            let _guard = held.armed.lock();
            panic!("holder panicked");
        })
        .join();
        assert!(joined.is_err());

        assert!(scheduler.start());
        assert!(scheduler.stop());
    }

    #[tokio::test]
    async fn test_sync_follows_auto_run() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![]).build();
        let scheduler = Scheduler::new(h.orchestrator.clone(), HOUR);

        scheduler.sync(true);
        assert!(scheduler.is_armed());
        scheduler.sync(true);
        assert!(scheduler.is_armed());
        scheduler.sync(false);
        assert!(!scheduler.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_period() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![posting("A")]).build();
        let scheduler = Scheduler::new(h.orchestrator.clone(), HOUR);
        scheduler.start();

        tokio::time::sleep(HOUR / 2).await;
        assert!(h.store.records().is_empty());

        tokio::time::sleep(HOUR).await;
        assert_eq!(h.store.records().len(), 1);

        tokio::time::sleep(HOUR).await;
        assert_eq!(h.store.records().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_scheduler_never_fires() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![posting("A")]).build();
        let scheduler = Scheduler::new(h.orchestrator.clone(), HOUR);
        scheduler.start();
        scheduler.stop();

        tokio::time::sleep(HOUR * 3).await;
        assert!(h.store.records().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_keeps_schedule_alive() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![])
            .without_resume()
            .build();
        let scheduler = Scheduler::new(h.orchestrator.clone(), HOUR);
        scheduler.start();

        tokio::time::sleep(HOUR * 2 + HOUR / 2).await;

        let records = h.store.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.status == RunStatus::Error));
        assert!(scheduler.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_during_active_run_is_skipped() {
        let h = HarnessBuilder::new(run_config(7, 30), vec![posting("A")]).build();
        let scheduler = Scheduler::new(h.orchestrator.clone(), HOUR);
        let held = h.orchestrator.tracker().try_start().unwrap();
        scheduler.start();

        tokio::time::sleep(HOUR + HOUR / 2).await;
        assert!(h.store.records().is_empty());

        held.finish("Complete");
        tokio::time::sleep(HOUR).await;
        assert_eq!(h.store.records().len(), 1);
    }
}
