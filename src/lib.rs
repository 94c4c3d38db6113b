//! Wikipaths: concurrent breadth-first path finding across a single site
//!
//! This crate searches the link graph of one site (by default
//! `en.wikipedia.org`) for a path from a source page to a sink page, expanding
//! pages with a fixed pool of workers and deduplicating discoveries in a single
//! coordinator.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Wikipaths operations
#[derive(Debug, Error)]
pub enum WikiPathError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("URL {url} must be on host {expected}")]
    HostMismatch { url: String, expected: String },

    #[error("thread count must be between {min} and {max}, got {got}")]
    ThreadCount { got: usize, min: usize, max: usize },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("URL {url} is outside scoping host {host}")]
    OutOfScope { url: String, host: String },

    #[error("URL {0} carries a query string")]
    HasQuery(String),
}

/// Errors raised while expanding a single page
///
/// These never abort a run: the worker pool turns them into an empty batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("Invalid page URL: {0}")]
    InvalidBase(#[from] UrlError),

    #[error("Extraction of {url} did not complete: {reason}")]
    Panicked { url: String, reason: String },
}

/// Result type alias for Wikipaths operations
pub type Result<T> = std::result::Result<T, WikiPathError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::RunConfig;
pub use crawler::{find_path, Coordinator, CrawlOutcome, CrawlReport, HttpLinkExtractor, LinkExtractor};
pub use state::{Batch, VisitedSet};
pub use url::{extract_domain, normalize_url};
