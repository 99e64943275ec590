use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Upper bound of the match score scale. The lower bound is 0.
pub const MAX_MATCH_SCORE: u8 = 10;

/// How a `MatchResult` was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The scorer returned a usable answer.
    Scored,
    /// Built from posting fields only after the scorer failed. Score is always 0.
    Degraded,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Scored => "scored",
            MatchKind::Degraded => "degraded",
        }
    }
}

/// Normalized, scored representation of one job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_title: String,
    pub company: String,
    pub employment_type: String,
    pub remote: String,
    pub salary: String,
    pub benefits: String,
    pub responsibilities: String,
    pub qualifications: String,
    pub apply_links: Vec<String>,
    /// Always within 0..=MAX_MATCH_SCORE.
    pub match_score: u8,
    pub match_reason: String,
    pub kind: MatchKind,
}

impl MatchResult {
    /// Tags the result as `Scored` and pulls the score back into range.
    pub fn into_scored(mut self) -> Self {
        self.match_score = self.match_score.min(MAX_MATCH_SCORE);
        self.kind = MatchKind::Scored;
        self
    }

    pub fn meets_threshold(&self, threshold: u8) -> bool {
        self.match_score >= threshold
    }
}

/// A persisted result row from the `job_matches` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatchRow {
    pub id: i32,
    pub job_title: String,
    pub company: String,
    pub employment_type: String,
    pub remote: String,
    pub salary: String,
    pub benefits: String,
    pub responsibilities: String,
    pub qualifications: String,
    pub apply_links: Vec<String>,
    pub match_score: i16,
    pub match_reason: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
