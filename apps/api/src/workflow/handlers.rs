use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::job_match::JobMatchRow;
use crate::models::run::RunHistoryRow;
use crate::state::AppState;
use crate::workflow::progress::CancelOutcome;
use crate::workflow::{ProgressState, WorkflowOutcome};

const RESULTS_LIMIT: i64 = 50;
const HISTORY_LIMIT: i64 = 10;

#[derive(Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/run
///
/// Runs the workflow to completion and reports the outcome.
pub async fn handle_run(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let body = match state.orchestrator.run_workflow().await? {
        WorkflowOutcome::Success(summary) => json!({
            "success": true,
            "jobsFound": summary.jobs_found,
            "jobsMatched": summary.jobs_matched,
            "emailSent": summary.email_sent,
            "message": summary.message,
        }),
        WorkflowOutcome::Cancelled => json!({
            "success": false,
            "cancelled": true,
            "message": "Workflow cancelled",
        }),
    };
    Ok(Json(body))
}

/// POST /api/cancel
pub async fn handle_cancel(State(state): State<AppState>) -> Json<CancelResponse> {
    Json(CancelResponse::from(state.orchestrator.cancel()))
}

impl From<CancelOutcome> for CancelResponse {
    fn from(outcome: CancelOutcome) -> Self {
        let (success, message) = match outcome {
            CancelOutcome::Requested => (true, "Cancel requested"),
            CancelOutcome::Idle => (false, "No workflow running"),
            CancelOutcome::Committed => (false, "Workflow is already saving results"),
        };
        Self { success, message }
    }
}

/// GET /api/progress
pub async fn handle_progress(State(state): State<AppState>) -> Json<ProgressState> {
    Json(state.orchestrator.progress())
}

/// GET /api/results
pub async fn handle_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobMatchRow>>, AppError> {
    Ok(Json(state.store.latest_results(RESULTS_LIMIT).await?))
}

/// GET /api/history
pub async fn handle_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<RunHistoryRow>>, AppError> {
    Ok(Json(state.store.run_history(HISTORY_LIMIT).await?))
}
