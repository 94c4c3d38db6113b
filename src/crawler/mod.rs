//! Crawler module: concurrent breadth-first search over a site's link graph
//!
//! This module contains:
//! - The coordinator (frontier draining, deduplication, termination)
//! - The worker pool (bounded-parallel page expansion)
//! - The link extractor seam and its HTTP implementation
//! - HTTP fetching and HTML link parsing

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod worker;

pub use coordinator::{Coordinator, CrawlOutcome, CrawlReport};
pub use extractor::{HttpLinkExtractor, LinkExtractor};
pub use fetcher::{build_http_client, fetch_page};
pub use parser::extract_links;
pub use worker::{DispatchReceiver, WorkerPool};

use crate::config::RunConfig;
use crate::WikiPathError;
use std::sync::Arc;

/// Searches for a path from the configured source to the sink over HTTP
///
/// This is the main entry point for a standalone run. It will:
/// 1. Build an HTTP link extractor from the configuration
/// 2. Seed the frontier with the source page
/// 3. Expand pages with `thread_count` workers until the sink is found,
///    the reachable graph is exhausted, or the run timeout elapses
///
/// # Example
///
/// ```no_run
/// use wikipaths::config::RunConfig;
/// use wikipaths::crawler::find_path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RunConfig::builder()
///     .source("https://en.wikipedia.org/wiki/Knowledge")
///     .sink("https://en.wikipedia.org/wiki/Philosophy")
///     .build()?;
/// let report = find_path(config).await?;
/// println!("{:?}", report.outcome);
/// # Ok(())
/// # }
/// ```
pub async fn find_path(config: RunConfig) -> Result<CrawlReport, WikiPathError> {
    let extractor = HttpLinkExtractor::from_config(&config)?;
    Coordinator::new(config, Arc::new(extractor)).run().await
}
