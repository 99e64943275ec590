use serde::Deserialize;

use crate::models::job_match::MAX_MATCH_SCORE;
use crate::models::settings::DEFAULT_JOB_LIMIT;
use crate::store::postgres::SettingsUpdate;

/// Largest job limit accepted; one run at this size already takes several minutes.
pub const MAX_JOB_LIMIT: i32 = 100;

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub email: String,
    pub job_query: String,
    pub expected_salary: i64,
    pub match_threshold: i32,
    #[serde(default)]
    pub job_limit: Option<i32>,
    #[serde(default)]
    pub auto_run: bool,
}

impl SettingsRequest {
    /// Checks every field and returns the update to persist, or the first problem found.
    pub fn validate(&self) -> Result<SettingsUpdate<'_>, String> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("email must be a valid address".to_string());
        }

        let job_query = self.job_query.trim();
        if job_query.is_empty() {
            return Err("job_query must not be empty".to_string());
        }

        if self.expected_salary < 0 {
            return Err("expected_salary must not be negative".to_string());
        }

        if !(0..=i32::from(MAX_MATCH_SCORE)).contains(&self.match_threshold) {
            return Err(format!(
                "match_threshold must be between 0 and {MAX_MATCH_SCORE}"
            ));
        }

        // 0 means "unset", same as omitting the field.
        let job_limit = match self.job_limit {
            None | Some(0) => DEFAULT_JOB_LIMIT as i32,
            Some(limit) => limit,
        };
        if !(1..=MAX_JOB_LIMIT).contains(&job_limit) {
            return Err(format!("job_limit must be between 1 and {MAX_JOB_LIMIT}"));
        }

        Ok(SettingsUpdate {
            email,
            job_query,
            expected_salary: self.expected_salary,
            match_threshold: self.match_threshold,
            job_limit,
            auto_run: self.auto_run,
        })
    }
}
