//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for link extraction:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for page content
//! - Error classification into [`ExtractError`]

use crate::ExtractError;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// Every request made through the client is bounded by `timeout`, so a fetch
/// either completes or fails within that budget and never hangs a worker.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use wikipaths::crawler::build_http_client;
///
/// let client = build_http_client("wikipaths/0.1", Duration::from_secs(2)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .build()
}

/// Fetches a page and returns its HTML body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Request exceeded the client timeout | `Timeout` |
/// | Connection or protocol failure | `Http` |
/// | Any status other than 200 | `Status` |
/// | Content-Type present and not HTML | `NotHtml` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, ExtractError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ExtractError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.contains("html") {
            return Err(ExtractError::NotHtml {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

fn classify_error(url: &str, error: reqwest::Error) -> ExtractError {
    if error.is_timeout() {
        ExtractError::Timeout {
            url: url.to_string(),
        }
    } else {
        ExtractError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
