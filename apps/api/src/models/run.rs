use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Error => "error",
        }
    }
}

/// One append-only entry of the run history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub status: RunStatus,
    pub jobs_found: usize,
    pub jobs_matched: usize,
    pub email_sent: bool,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RunRecord {
    pub fn success(jobs_found: usize, jobs_matched: usize, email_sent: bool) -> Self {
        Self {
            status: RunStatus::Success,
            jobs_found,
            jobs_matched,
            email_sent,
            error_message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            jobs_found: 0,
            jobs_matched: 0,
            email_sent: false,
            error_message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RunHistoryRow {
    pub id: i32,
    pub status: String,
    pub jobs_found: i32,
    pub jobs_matched: i32,
    pub email_sent: bool,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
