use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::settings::SettingsRow;
use crate::settings::validation::SettingsRequest;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SettingsResponse {
    #[serde(flatten)]
    pub settings: SettingsRow,
    /// Whether match emails can be delivered at all (SMTP configured).
    pub email_enabled: bool,
    pub scheduler_armed: bool,
}

/// GET /api/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = state
        .store
        .settings()
        .await?
        .ok_or_else(|| AppError::NotFound("Settings not found".to_string()))?;
    Ok(Json(respond(&state, settings)))
}

/// PUT or POST /api/settings
///
/// Validates and stores the new configuration, then re-evaluates the scheduler.
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let update = req.validate().map_err(AppError::Validation)?;
    let settings = state.store.update_settings(update).await?;

    state.scheduler.sync(settings.auto_run);
    info!(
        auto_run = settings.auto_run,
        "Settings updated (query: {})", settings.job_query
    );

    Ok(Json(respond(&state, settings)))
}

fn respond(state: &AppState, settings: SettingsRow) -> SettingsResponse {
    SettingsResponse {
        settings,
        email_enabled: state.config.smtp.is_some(),
        scheduler_armed: state.scheduler.is_armed(),
    }
}
