//! Persistence seams consumed by the workflow.
//!
//! The workflow only sees these traits; `PgStore` implements all of them and
//! also carries the read/write queries the HTTP handlers need.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::job_match::MatchResult;
use crate::models::resume::ResumeContext;
use crate::models::run::RunRecord;
use crate::models::settings::RunConfig;

pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Supplies the current run configuration. Fails `NotFound` if unset.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn current(&self) -> Result<RunConfig, StoreError>;
}

/// Supplies the most recently uploaded resume. Fails `NotFound` if none.
#[async_trait]
pub trait ResumeProvider: Send + Sync {
    async fn latest(&self) -> Result<ResumeContext, StoreError>;
}

/// Result and run-history persistence. Each call is atomic.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Replaces the whole persisted result set with `results`.
    async fn replace_all(&self, results: &[MatchResult]) -> Result<(), StoreError>;

    async fn append_run_record(&self, record: &RunRecord) -> Result<(), StoreError>;
}
