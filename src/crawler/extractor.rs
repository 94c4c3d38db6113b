//! Link extraction: the expand-one-node step
//!
//! The crawl core only knows the [`LinkExtractor`] trait. [`HttpLinkExtractor`]
//! is the production implementation; tests plug in in-memory graphs.

use crate::config::RunConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::extract_links;
use crate::url::normalize_url;
use crate::ExtractError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Returns the outbound links of one page
///
/// Implementations must bound their own latency and must only return
/// canonical links on `scoping_host` without a query string; the crawl core
/// does not re-filter.
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    async fn extract(&self, page_url: &str, scoping_host: &str) -> Result<Vec<String>, ExtractError>;
}

/// Fetches pages over HTTP and extracts their `<a href>` links
#[derive(Debug, Clone)]
pub struct HttpLinkExtractor {
    client: Client,
}

impl HttpLinkExtractor {
    /// Creates an extractor whose requests give up after `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(user_agent, timeout)?))
    }

    /// Creates an extractor from a run configuration's HTTP settings
    pub fn from_config(config: &RunConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.user_agent, config.fetch_timeout)
    }

    /// Wraps an existing client; the caller is responsible for its timeout
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkExtractor for HttpLinkExtractor {
    async fn extract(&self, page_url: &str, scoping_host: &str) -> Result<Vec<String>, ExtractError> {
        let base = normalize_url(page_url)?;
        let html = fetch_page(&self.client, base.as_str()).await?;
        Ok(extract_links(&html, &base, scoping_host))
    }
}
