//! Scoring Pipeline — scores postings sequentially, never aborting on a bad one.
//!
//! Per item: cancel check → progress → scorer call (bounded by a timeout) →
//! degrade on failure. A courtesy pause separates consecutive calls; a cancel
//! request cuts that pause short.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::job_search::JobPosting;
use crate::matching::normalize::degraded_result;
use crate::matching::scorer::{MatchScorer, ScoringError};
use crate::models::job_match::MatchResult;
use crate::models::resume::ResumeContext;
use crate::workflow::progress::ActiveRun;

#[derive(Debug)]
pub struct PipelineOutcome {
    /// One entry per processed posting, input order.
    pub results: Vec<MatchResult>,
    /// Cancellation was observed before the pipeline finished.
    pub cancelled: bool,
}

pub struct ScoringPipeline<'a> {
    scorer: &'a dyn MatchScorer,
    courtesy_delay: Duration,
    score_timeout: Duration,
}

impl<'a> ScoringPipeline<'a> {
    pub fn new(scorer: &'a dyn MatchScorer, courtesy_delay: Duration, score_timeout: Duration) -> Self {
        Self {
            scorer,
            courtesy_delay,
            score_timeout,
        }
    }

    pub async fn run(
        &self,
        postings: &[JobPosting],
        resume: &ResumeContext,
        expected_salary: i64,
        run: &ActiveRun,
    ) -> PipelineOutcome {
        let total = postings.len();
        let mut results = Vec::with_capacity(total);

        for (index, posting) in postings.iter().enumerate() {
            if run.is_cancelled() {
                info!("Cancellation observed after {index} of {total} postings");
                break;
            }

            let position = index + 1;
            run.advance(position, total, format!("Analyzing job {position} of {total}..."));
            info!("Matching job {position}/{total}: {}", posting.display_title());

            let result = match self.score_one(posting, resume, expected_salary).await {
                Ok(result) => {
                    let result = result.into_scored();
                    debug!(score = result.match_score, "Scored {}", result.job_title);
                    result
                }
                Err(err) => {
                    warn!("Failed to score {}: {err}", posting.display_title());
                    degraded_result(posting, &err.to_string())
                }
            };
            results.push(result);

            if position < total {
                tokio::select! {
                    _ = tokio::time::sleep(self.courtesy_delay) => {}
                    _ = run.token().cancelled() => {}
                }
            }
        }

        PipelineOutcome {
            results,
            cancelled: run.is_cancelled(),
        }
    }

    async fn score_one(
        &self,
        posting: &JobPosting,
        resume: &ResumeContext,
        expected_salary: i64,
    ) -> Result<MatchResult, ScoringError> {
        tokio::time::timeout(
            self.score_timeout,
            self.scorer.score(posting, resume, expected_salary),
        )
        .await
        .map_err(|_| ScoringError::Timeout(self.score_timeout))?
    }
}
