use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::job_match::MAX_MATCH_SCORE;

/// Job limit used when the stored value is missing or non-positive.
pub const DEFAULT_JOB_LIMIT: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SettingsRow {
    pub id: i32,
    pub email: String,
    pub job_query: String,
    pub expected_salary: i64,
    pub match_threshold: i32,
    pub job_limit: i32,
    pub auto_run: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of the tunable parameters for one workflow execution.
/// Captured once when a run starts and never touched again during that run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub recipient: String,
    pub job_query: String,
    pub expected_salary: i64,
    /// Always within 0..=10.
    pub match_threshold: u8,
    /// Always > 0.
    pub job_limit: usize,
    pub auto_run: bool,
}

impl From<SettingsRow> for RunConfig {
    fn from(row: SettingsRow) -> Self {
        let match_threshold = row.match_threshold.clamp(0, MAX_MATCH_SCORE as i32) as u8;
        let job_limit = usize::try_from(row.job_limit)
            .ok()
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_JOB_LIMIT);

        Self {
            recipient: row.email,
            job_query: row.job_query,
            expected_salary: row.expected_salary,
            match_threshold,
            job_limit,
            auto_run: row.auto_run,
        }
    }
}
