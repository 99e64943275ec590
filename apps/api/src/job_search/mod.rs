//! Job Source — the remote search that supplies candidate postings for a run.
//!
//! `JobSource` is the seam the workflow depends on; `JSearchClient` is the
//! production backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod jsearch;

pub use jsearch::JSearchClient;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job search API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One externally supplied job posting.
///
/// Only the fields the workflow reads are typed; everything else the provider
/// returns is kept in `extra` so the scorer sees the full listing.
/// Postings carry no guaranteed unique identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_is_remote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_min_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_max_salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_required_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_apply_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPosting {
    pub fn display_title(&self) -> &str {
        self.job_title.as_deref().unwrap_or("Unknown")
    }
}

/// Supplies postings for a query, in provider order.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, query: &str, page_count: u32) -> Result<Vec<JobPosting>, SearchError>;
}
