//! In-memory collaborators for workflow tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::job_search::{JobPosting, JobSource, SearchError};
use crate::matching::normalize::degraded_result;
use crate::matching::scorer::{MatchScorer, ScoringError};
use crate::models::job_match::{MatchKind, MatchResult};
use crate::models::resume::ResumeContext;
use crate::models::run::RunRecord;
use crate::models::settings::RunConfig;
use crate::notify::{Notifier, NotifyError};
use crate::store::{ConfigProvider, ResultStore, ResumeProvider, StoreError};
use crate::workflow::progress::{CancelOutcome, ProgressState, ProgressTracker};
use crate::workflow::{Collaborators, Orchestrator, WorkflowOptions};

pub fn posting(title: &str) -> JobPosting {
    JobPosting {
        job_title: Some(title.to_string()),
        employer_name: Some(format!("{title} Corp")),
        ..JobPosting::default()
    }
}

pub fn run_config(threshold: u8, job_limit: usize) -> RunConfig {
    RunConfig {
        recipient: "dev@example.com".to_string(),
        job_query: "rust engineer".to_string(),
        expected_salary: 150_000,
        match_threshold: threshold,
        job_limit,
        auto_run: false,
    }
}

/// Options with no courtesy pause so real-clock tests stay fast.
pub fn fast_options() -> WorkflowOptions {
    WorkflowOptions {
        courtesy_delay: Duration::ZERO,
        ..WorkflowOptions::default()
    }
}

pub struct FakeConfig(pub Option<RunConfig>);

#[async_trait]
impl ConfigProvider for FakeConfig {
    async fn current(&self) -> Result<RunConfig, StoreError> {
        self.0.clone().ok_or(StoreError::NotFound("Settings"))
    }
}

pub struct FakeResumes(pub Option<ResumeContext>);

#[async_trait]
impl ResumeProvider for FakeResumes {
    async fn latest(&self) -> Result<ResumeContext, StoreError> {
        self.0.clone().ok_or(StoreError::NotFound("Resume"))
    }
}

#[derive(Default)]
pub struct FakeJobSource {
    pub postings: Vec<JobPosting>,
    pub fail: bool,
    /// Never answers.
    pub hang: bool,
    pub calls: AtomicUsize,
    pub last_page_count: AtomicUsize,
}

impl FakeJobSource {
    pub fn with(postings: Vec<JobPosting>) -> Self {
        Self {
            postings,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl JobSource for FakeJobSource {
    async fn search(&self, _query: &str, page_count: u32) -> Result<Vec<JobPosting>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_page_count
            .store(page_count as usize, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(SearchError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }
        Ok(self.postings.clone())
    }
}

/// What the scripted scorer does for a given posting title.
#[derive(Clone)]
pub enum Script {
    Score(u8),
    Fail(&'static str),
    Hang,
}

/// Scorer driven by a per-title script. Unscripted titles score 5.
#[derive(Default)]
pub struct ScriptedScorer {
    script: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
    snapshots: Mutex<Vec<ProgressState>>,
    /// Requests cancellation when the n-th call (1-based) starts.
    cancel_on_call: Mutex<Option<(usize, ProgressTracker)>>,
    /// Records the tracker state seen at each call.
    observe: Mutex<Option<ProgressTracker>>,
    /// When set, every call waits for a permit first.
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedScorer {
    pub fn new(script: &[(&str, Script)]) -> Self {
        Self {
            script: script
                .iter()
                .map(|(title, action)| (title.to_string(), action.clone()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn cancel_on_call(&self, call: usize, tracker: ProgressTracker) {
        *self.cancel_on_call.lock().unwrap() = Some((call, tracker));
    }

    pub fn observe(&self, tracker: ProgressTracker) {
        *self.observe.lock().unwrap() = Some(tracker);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn snapshots(&self) -> Vec<ProgressState> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchScorer for ScriptedScorer {
    async fn score(
        &self,
        posting: &JobPosting,
        _resume: &ResumeContext,
        _expected_salary: i64,
    ) -> Result<MatchResult, ScoringError> {
        let title = posting.display_title().to_string();
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(title.clone());
            calls.len()
        };

        let observed = self.observe.lock().unwrap().clone();
        if let Some(tracker) = observed {
            self.snapshots.lock().unwrap().push(tracker.snapshot());
        }
        let cancel_at = self.cancel_on_call.lock().unwrap().clone();
        if let Some((n, tracker)) = cancel_at {
            if n == call {
                tracker.cancel();
            }
        }
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }

        match self.script.get(&title).cloned().unwrap_or(Script::Score(5)) {
            Script::Score(score) => {
                let mut result = degraded_result(posting, "");
                result.match_score = score;
                result.match_reason = format!("scored {score}");
                result.kind = MatchKind::Scored;
                Ok(result)
            }
            Script::Fail(message) => Err(ScoringError::Llm(crate::llm_client::LlmError::Api {
                status: 500,
                message: message.to_string(),
            })),
            Script::Hang => std::future::pending().await,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub results: Mutex<Vec<MatchResult>>,
    pub records: Mutex<Vec<RunRecord>>,
    pub replace_calls: AtomicUsize,
    pub fail_replace: bool,
    pub hang_replace: bool,
}

impl MemoryStore {
    pub fn failing_replace() -> Self {
        Self {
            fail_replace: true,
            ..Self::default()
        }
    }

    pub fn hanging_replace() -> Self {
        Self {
            hang_replace: true,
            ..Self::default()
        }
    }

    pub fn results(&self) -> Vec<MatchResult> {
        self.results.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn replace_all(&self, results: &[MatchResult]) -> Result<(), StoreError> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_replace {
            std::future::pending::<()>().await;
        }
        if self.fail_replace {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        *self.results.lock().unwrap() = results.to_vec();
        Ok(())
    }

    async fn append_run_record(&self, record: &RunRecord) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct Sent {
    pub recipient: String,
    pub matches: Vec<MatchResult>,
    pub threshold: u8,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: bool,
    pub hang: bool,
    /// Tries to cancel the run from inside `send` and keeps the answer.
    cancel_from_send: Mutex<Option<ProgressTracker>>,
    cancel_outcome: Mutex<Option<CancelOutcome>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn cancel_from_send(&self, tracker: ProgressTracker) {
        *self.cancel_from_send.lock().unwrap() = Some(tracker);
    }

    pub fn cancel_outcome(&self) -> Option<CancelOutcome> {
        *self.cancel_outcome.lock().unwrap()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipient: &str,
        matches: &[MatchResult],
        threshold: u8,
    ) -> Result<(), NotifyError> {
        let tracker = self.cancel_from_send.lock().unwrap().clone();
        if let Some(tracker) = tracker {
            *self.cancel_outcome.lock().unwrap() = Some(tracker.cancel());
        }
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(NotifyError::Send("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(Sent {
            recipient: recipient.to_string(),
            matches: matches.to_vec(),
            threshold,
        });
        Ok(())
    }
}

/// Fakes wired into an orchestrator, with handles kept for assertions.
pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub jobs: Arc<FakeJobSource>,
    pub scorer: Arc<ScriptedScorer>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct HarnessBuilder {
    config: Option<RunConfig>,
    resume: Option<ResumeContext>,
    jobs: FakeJobSource,
    scorer: ScriptedScorer,
    store: MemoryStore,
    notifier: RecordingNotifier,
}

impl HarnessBuilder {
    pub fn new(config: RunConfig, postings: Vec<JobPosting>) -> Self {
        Self {
            config: Some(config),
            resume: Some(ResumeContext::new("Rust, Tokio, Postgres")),
            jobs: FakeJobSource::with(postings),
            scorer: ScriptedScorer::default(),
            store: MemoryStore::default(),
            notifier: RecordingNotifier::default(),
        }
    }

    pub fn without_config(mut self) -> Self {
        self.config = None;
        self
    }

    pub fn without_resume(mut self) -> Self {
        self.resume = None;
        self
    }

    pub fn jobs(mut self, jobs: FakeJobSource) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn scorer(mut self, scorer: ScriptedScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn notifier(mut self, notifier: RecordingNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn build(self) -> Harness {
        let jobs = Arc::new(self.jobs);
        let scorer = Arc::new(self.scorer);
        let store = Arc::new(self.store);
        let notifier = Arc::new(self.notifier);

        let deps = Collaborators {
            config: Arc::new(FakeConfig(self.config)),
            resumes: Arc::new(FakeResumes(self.resume)),
            jobs: jobs.clone(),
            scorer: scorer.clone(),
            store: store.clone(),
            notifier: notifier.clone(),
        };

        Harness {
            orchestrator: Arc::new(Orchestrator::new(deps, fast_options())),
            jobs,
            scorer,
            store,
            notifier,
        }
    }
}
