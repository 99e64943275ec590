use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i32,
    pub filename: String,
    pub raw_text: String,
    /// LLM-structured profile. `None` for rows stored before parsing succeeded.
    pub parsed_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Candidate profile text handed to the match scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeContext {
    pub text: String,
}

impl ResumeContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<ResumeRow> for ResumeContext {
    /// Prefers the structured profile, falling back to the raw extracted text.
    fn from(row: ResumeRow) -> Self {
        let text = row
            .parsed_text
            .filter(|parsed| !parsed.trim().is_empty())
            .unwrap_or(row.raw_text);
        Self { text }
    }
}
