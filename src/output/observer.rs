//! Observability side-channel
//!
//! Observers see progress events but never influence control flow: every
//! method returns `()` and is called after the coordinator or worker has
//! already decided what to do.

use crate::crawler::CrawlOutcome;
use crate::ExtractError;
use std::sync::Arc;

/// Receives search progress events
///
/// All methods default to doing nothing, so implementors only override what
/// they care about. Methods may be called concurrently from several workers.
pub trait CrawlObserver: Send + Sync {
    /// A worker is about to expand `url`
    fn on_crawling(&self, _url: &str) {}

    /// A batch produced at least one new page; `count` is the new total
    fn on_visit_count(&self, _count: u64) {}

    /// The sink was discovered after `visits` distinct pages
    fn on_sink_found(&self, _sink: &str, _visits: u64) {}

    /// Expanding `url` failed; the page is treated as a dead end
    fn on_extraction_error(&self, _url: &str, _error: &ExtractError) {}

    /// The run concluded and every worker has stopped
    fn on_run_complete(&self, _outcome: &CrawlOutcome) {}
}

/// Emits every event as a `tracing` record
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_crawling(&self, url: &str) {
        tracing::debug!(url = %url, "crawling");
    }

    fn on_visit_count(&self, count: u64) {
        tracing::info!(count, "visit count now {}", count);
    }

    fn on_sink_found(&self, sink: &str, visits: u64) {
        tracing::info!(sink = %sink, visits, "found sink after {} visits", visits);
    }

    fn on_extraction_error(&self, url: &str, error: &ExtractError) {
        tracing::warn!(url = %url, "extraction error for {}: {}", url, error);
    }

    fn on_run_complete(&self, outcome: &CrawlOutcome) {
        tracing::debug!(visits = outcome.visits(), "run complete: {:?}", outcome);
    }
}

/// Registry fanning events out to several observers
#[derive(Default, Clone)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn CrawlObserver>>,
}

impl ObserverRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer to receive search events
    pub fn register(&mut self, observer: Arc<dyn CrawlObserver>) {
        self.observers.push(observer);
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CrawlObserver for ObserverRegistry {
    fn on_crawling(&self, url: &str) {
        for observer in &self.observers {
            observer.on_crawling(url);
        }
    }

    fn on_visit_count(&self, count: u64) {
        for observer in &self.observers {
            observer.on_visit_count(count);
        }
    }

    fn on_sink_found(&self, sink: &str, visits: u64) {
        for observer in &self.observers {
            observer.on_sink_found(sink, visits);
        }
    }

    fn on_extraction_error(&self, url: &str, error: &ExtractError) {
        for observer in &self.observers {
            observer.on_extraction_error(url, error);
        }
    }

    fn on_run_complete(&self, outcome: &CrawlOutcome) {
        for observer in &self.observers {
            observer.on_run_complete(outcome);
        }
    }
}
