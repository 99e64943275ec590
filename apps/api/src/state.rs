use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notify::Notifier;
use crate::store::PgStore;
use crate::workflow::{Orchestrator, Scheduler};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: PgStore,
    pub llm: LlmClient,
    pub config: Config,
    /// The single process-wide orchestrator; manual and scheduled runs share it.
    pub orchestrator: Arc<Orchestrator>,
    pub scheduler: Arc<Scheduler>,
    /// Same notifier the orchestrator sends match emails through.
    pub notifier: Arc<dyn Notifier>,
}
