use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resume::extract::{extract_pdf_text, preview};
use crate::resume::parser::parse_resume;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "resume";
const PREVIEW_CHARS: usize = 500;

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub preview: String,
}

/// POST /api/resume, also mounted at POST /api/upload
///
/// Multipart upload with the PDF in the `resume` field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, data) = read_upload(&mut multipart).await?;
    info!("Resume upload received: {filename} ({} bytes)", data.len());

    // pdf-extract is CPU-bound; keep it off the async workers.
    let raw_text = tokio::task::spawn_blocking(move || extract_pdf_text(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??;
    info!("PDF text extracted ({} chars)", raw_text.len());

    let parsed_text = parse_resume(&state.llm, &raw_text).await?;
    let row = state
        .store
        .insert_resume(&filename, &raw_text, &parsed_text)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        filename: row.filename,
        preview: preview(&raw_text, PREVIEW_CHARS),
    }))
}

/// GET /api/resume
///
/// Latest resume, or `null` when none has been uploaded.
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<Option<ResumeRow>>, AppError> {
    Ok(Json(state.store.latest_resume().await?))
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("resume.pdf")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        return Ok((filename, data));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}
