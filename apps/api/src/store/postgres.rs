use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::job_match::{JobMatchRow, MatchResult};
use crate::models::resume::{ResumeContext, ResumeRow};
use crate::models::run::{RunHistoryRow, RunRecord};
use crate::models::settings::{RunConfig, SettingsRow};
use crate::store::{ConfigProvider, ResultStore, ResumeProvider, StoreError};

/// Parameters for updating the settings row.
#[derive(Debug)]
pub struct SettingsUpdate<'a> {
    pub email: &'a str,
    pub job_query: &'a str,
    pub expected_salary: i64,
    pub match_threshold: i32,
    pub job_limit: i32,
    pub auto_run: bool,
}

/// Postgres-backed store. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the newest settings row, if any.
    pub async fn settings(&self) -> Result<Option<SettingsRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, SettingsRow>("SELECT * FROM settings ORDER BY id DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Updates the newest settings row in place and returns it.
    pub async fn update_settings(
        &self,
        update: SettingsUpdate<'_>,
    ) -> Result<SettingsRow, StoreError> {
        sqlx::query_as::<_, SettingsRow>(
            r#"
            UPDATE settings
            SET email = $1, job_query = $2, expected_salary = $3,
                match_threshold = $4, job_limit = $5, auto_run = $6, updated_at = NOW()
            WHERE id = (SELECT id FROM settings ORDER BY id DESC LIMIT 1)
            RETURNING *
            "#,
        )
        .bind(update.email)
        .bind(update.job_query)
        .bind(update.expected_salary)
        .bind(update.match_threshold)
        .bind(update.job_limit)
        .bind(update.auto_run)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Settings"))
    }

    pub async fn insert_resume(
        &self,
        filename: &str,
        raw_text: &str,
        parsed_text: &str,
    ) -> Result<ResumeRow, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (filename, raw_text, parsed_text)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(filename)
        .bind(raw_text)
        .bind(parsed_text)
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn latest_resume(&self) -> Result<Option<ResumeRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes ORDER BY id DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    /// Persisted results of the latest successful run, best first.
    pub async fn latest_results(&self, limit: i64) -> Result<Vec<JobMatchRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobMatchRow>(
            "SELECT * FROM job_matches ORDER BY match_score DESC, id ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn run_history(&self, limit: i64) -> Result<Vec<RunHistoryRow>, StoreError> {
        Ok(sqlx::query_as::<_, RunHistoryRow>(
            "SELECT * FROM run_history ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ConfigProvider for PgStore {
    async fn current(&self) -> Result<RunConfig, StoreError> {
        self.settings()
            .await?
            .map(RunConfig::from)
            .ok_or(StoreError::NotFound("Settings"))
    }
}

#[async_trait]
impl ResumeProvider for PgStore {
    async fn latest(&self) -> Result<ResumeContext, StoreError> {
        self.latest_resume()
            .await?
            .map(ResumeContext::from)
            .ok_or(StoreError::NotFound("Resume"))
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn replace_all(&self, results: &[MatchResult]) -> Result<(), StoreError> {
        // DELETE + INSERTs commit together or not at all.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM job_matches")
            .execute(&mut *tx)
            .await?;

        for result in results {
            sqlx::query(
                r#"
                INSERT INTO job_matches
                    (job_title, company, employment_type, remote, salary, benefits,
                     responsibilities, qualifications, apply_links, match_score, match_reason, kind)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(&result.job_title)
            .bind(&result.company)
            .bind(&result.employment_type)
            .bind(&result.remote)
            .bind(&result.salary)
            .bind(&result.benefits)
            .bind(&result.responsibilities)
            .bind(&result.qualifications)
            .bind(&result.apply_links)
            .bind(i16::from(result.match_score))
            .bind(&result.match_reason)
            .bind(result.kind.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("Replaced persisted results with {} entries", results.len());
        Ok(())
    }

    async fn append_run_record(&self, record: &RunRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO run_history (status, jobs_found, jobs_matched, email_sent, error_message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.status.as_str())
        .bind(i32::try_from(record.jobs_found).unwrap_or(i32::MAX))
        .bind(i32::try_from(record.jobs_matched).unwrap_or(i32::MAX))
        .bind(record.email_sent)
        .bind(record.error_message.as_deref())
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
