use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{JobPosting, JobSource, SearchError};

const JSEARCH_API_URL: &str = "https://api.openwebninja.com/jsearch/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<JobPosting>>,
}

/// JSearch-backed `JobSource`.
#[derive(Clone)]
pub struct JSearchClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl JSearchClient {
    pub fn new(api_key: String) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: JSEARCH_API_URL.to_string(),
        })
    }
}

#[async_trait]
impl JobSource for JSearchClient {
    async fn search(&self, query: &str, page_count: u32) -> Result<Vec<JobPosting>, SearchError> {
        info!("Searching jobs: query={query:?} pages={page_count}");

        let pages = page_count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("query", query), ("num_pages", pages.as_str())])
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let postings = parse_search_body(&body)?;
        debug!("JSearch returned {} postings", postings.len());
        Ok(postings)
    }
}

/// A missing or null `data` array means no results, not an error.
fn parse_search_body(body: &str) -> Result<Vec<JobPosting>, SearchError> {
    let parsed: SearchResponse = serde_json::from_str(body).map_err(|e| SearchError::Api {
        status: 200,
        message: format!("Unreadable search response: {e}"),
    })?;
    Ok(parsed.data.unwrap_or_default())
}
