pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::notify::handlers as notify;
use crate::resume::handlers as resume;
use crate::settings::handlers as settings;
use crate::state::AppState;
use crate::workflow::handlers as workflow;

/// Resume PDFs above this size are rejected before extraction.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Workflow
        .route("/api/run", post(workflow::handle_run))
        .route("/api/cancel", post(workflow::handle_cancel))
        .route("/api/progress", get(workflow::handle_progress))
        .route("/api/results", get(workflow::handle_results))
        .route("/api/history", get(workflow::handle_history))
        // Configuration
        .route(
            "/api/settings",
            get(settings::handle_get_settings)
                .post(settings::handle_update_settings)
                .put(settings::handle_update_settings),
        )
        .route(
            "/api/resume",
            get(resume::handle_get_resume).post(resume::handle_upload),
        )
        .route("/api/upload", post(resume::handle_upload))
        .route("/api/test-email", post(notify::handle_test_email))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
