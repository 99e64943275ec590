use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::notify::NotifyError;
use crate::store::StoreError;
use crate::workflow::WorkflowError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Workflow(e) => {
                let (status, code) = workflow_status(e);
                (status, code, e.to_string())
            }
            AppError::Notify(e) => {
                tracing::error!("Email error: {e}");
                let (status, code) = notify_status(e);
                (status, code, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn workflow_status(err: &WorkflowError) -> (StatusCode, &'static str) {
    match err {
        WorkflowError::AlreadyRunning => (StatusCode::CONFLICT, "ALREADY_RUNNING"),
        WorkflowError::ConfigMissing | WorkflowError::ResumeMissing => {
            (StatusCode::BAD_REQUEST, "NOT_CONFIGURED")
        }
        WorkflowError::UpstreamSearch(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        WorkflowError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
        WorkflowError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
    }
}

fn notify_status(err: &NotifyError) -> (StatusCode, &'static str) {
    match err {
        NotifyError::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "EMAIL_DISABLED"),
        NotifyError::Address(_) => (StatusCode::BAD_REQUEST, "INVALID_RECIPIENT"),
        NotifyError::Build(_) | NotifyError::Send(_) => (StatusCode::BAD_GATEWAY, "EMAIL_ERROR"),
    }
}
