use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::HONESTY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::resume::prompts::RESUME_PARSE_SYSTEM;

/// Turns raw resume text into a structured, scorer-friendly profile.
pub async fn parse_resume(llm: &LlmClient, raw_text: &str) -> Result<String, AppError> {
    let system = format!("{RESUME_PARSE_SYSTEM}\n\n{HONESTY_INSTRUCTION}");

    let parsed = llm
        .call_text(&system, raw_text)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let parsed = parsed.trim();
    if parsed.is_empty() {
        return Err(AppError::Llm("Resume parser returned no text".to_string()));
    }

    info!("Resume parsed ({} chars)", parsed.len());
    Ok(parsed.to_string())
}
