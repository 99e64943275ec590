//! Match Scorer — pluggable, trait-based scoring of one posting against the resume.
//!
//! Default: `LlmMatchScorer` (chat-completions in JSON mode).
//! The workflow holds an `Arc<dyn MatchScorer>` and never lets a
//! `ScoringError` escape the scoring loop.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::job_search::JobPosting;
use crate::llm_client::prompts::{HONESTY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::matching::normalize::RawMatch;
use crate::matching::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::models::job_match::MatchResult;
use crate::models::resume::ResumeContext;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("Could not serialize job posting: {0}")]
    Posting(#[from] serde_json::Error),

    #[error("Scoring timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Implement this to swap scoring backends without touching the workflow.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        posting: &JobPosting,
        resume: &ResumeContext,
        expected_salary: i64,
    ) -> Result<MatchResult, ScoringError>;
}

pub struct LlmMatchScorer {
    llm: LlmClient,
}

impl LlmMatchScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    async fn score(
        &self,
        posting: &JobPosting,
        resume: &ResumeContext,
        expected_salary: i64,
    ) -> Result<MatchResult, ScoringError> {
        let prompt = build_match_prompt(posting, resume, expected_salary)?;
        let raw: RawMatch = self.llm.call_json(MATCH_SYSTEM, &prompt).await?;
        Ok(raw.into_result(posting))
    }
}

fn build_match_prompt(
    posting: &JobPosting,
    resume: &ResumeContext,
    expected_salary: i64,
) -> Result<String, ScoringError> {
    let job_json = serde_json::to_string_pretty(posting)?;

    Ok(MATCH_PROMPT_TEMPLATE
        .replace("{honesty_instruction}", HONESTY_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{expected_salary}", &expected_salary.to_string())
        .replace("{job_json}", &job_json)
        .replace("{resume}", resume.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_resume_salary_and_listing() {
        let posting = JobPosting {
            job_title: Some("Rust Engineer".to_string()),
            employer_name: Some("Oxide".to_string()),
            ..JobPosting::default()
        };
        let resume = ResumeContext::new("Skills: Rust, Tokio, Postgres");

        let prompt = build_match_prompt(&posting, &resume, 140_000).unwrap();

        assert!(prompt.contains("Skills: Rust, Tokio, Postgres"));
        assert!(prompt.contains("$140000"));
        assert!(prompt.contains("\"employer_name\": \"Oxide\""));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{job_json}"));
        assert!(!prompt.contains("{expected_salary}"));
        assert!(!prompt.contains("{json_only}"));
    }

    #[test]
    fn test_resume_placeholders_are_not_expanded() {
        // Resume text is substituted last so braces inside it survive verbatim.
        let resume = ResumeContext::new("Worked on {job_json} templating engine");
        let prompt = build_match_prompt(&JobPosting::default(), &resume, 1).unwrap();
        assert!(prompt.contains("Worked on {job_json} templating engine"));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = ScoringError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Scoring timed out after 30s");
    }
}
