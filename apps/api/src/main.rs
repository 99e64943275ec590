mod config;
mod db;
mod errors;
mod job_search;
mod llm_client;
mod matching;
mod models;
mod notify;
mod resume;
mod routes;
mod settings;
mod state;
mod store;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::job_search::JSearchClient;
use crate::llm_client::LlmClient;
use crate::matching::scorer::LlmMatchScorer;
use crate::models::settings::RunConfig;
use crate::notify::{DisabledNotifier, Notifier, SmtpNotifier};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;
use crate::workflow::scheduler::DEFAULT_PERIOD;
use crate::workflow::{Collaborators, Orchestrator, Scheduler, WorkflowOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobScout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db, &config.default_email).await?;
    let store = PgStore::new(db);

    // Initialize LLM client
    let llm = LlmClient::new(config.mistral_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let jobs = JSearchClient::new(config.jsearch_api_key.clone())?;

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpNotifier::new(smtp)?),
        None => {
            warn!("SMTP_HOST not set; match emails are disabled");
            Arc::new(DisabledNotifier)
        }
    };

    let store_handle = Arc::new(store.clone());
    let orchestrator = Arc::new(Orchestrator::new(
        Collaborators {
            config: store_handle.clone(),
            resumes: store_handle.clone(),
            jobs: Arc::new(jobs),
            scorer: Arc::new(LlmMatchScorer::new(llm.clone())),
            store: store_handle,
            notifier: notifier.clone(),
        },
        WorkflowOptions::default(),
    ));

    // Arm the hourly trigger if the stored settings ask for it
    let scheduler = Arc::new(Scheduler::new(orchestrator.clone(), DEFAULT_PERIOD));
    match store.settings().await? {
        Some(row) => scheduler.sync(RunConfig::from(row).auto_run),
        None => info!("No settings yet; scheduler stays off"),
    }

    // Build app state
    let state = AppState {
        store,
        llm,
        config: config.clone(),
        orchestrator,
        scheduler: scheduler.clone(),
        notifier,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            scheduler.stop();
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
