//! Crawl coordinator: the breadth-first search state machine
//!
//! The coordinator is the single decision point of a run. It:
//! - Seeds the frontier queue with the source page
//! - Drains batches, deduplicating every link through the visited set
//! - Declares success on the first new occurrence of the sink
//! - Forwards every other new link to the worker pool
//! - Detects exhaustion by tracking outstanding work
//! - Drives shutdown: cancel, join workers, then drop both queues
//!
//! Only the coordinator touches the visited set and the visit counter.

use crate::config::RunConfig;
use crate::crawler::worker::WorkerPool;
use crate::crawler::LinkExtractor;
use crate::output::{CrawlObserver, ObserverRegistry, RunStats, TracingObserver};
use crate::state::{Batch, RunState, VisitCounter};
use crate::WikiPathError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The sink was reached
    Found {
        /// Distinct pages discovered before the sink, excluding the seed
        visits: u64,
        /// Discovery chain from source to sink, both included
        path: Vec<String>,
    },

    /// Every reachable page was expanded without meeting the sink
    Exhausted { visits: u64 },

    /// The caller's cancellation token fired
    Cancelled { visits: u64 },

    /// The configured run timeout elapsed
    TimedOut { visits: u64 },
}

impl CrawlOutcome {
    /// Visit count at the moment the outcome was decided
    pub fn visits(&self) -> u64 {
        match self {
            Self::Found { visits, .. }
            | Self::Exhausted { visits }
            | Self::Cancelled { visits }
            | Self::TimedOut { visits } => *visits,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Outcome of a run together with its statistics
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    pub stats: RunStats,
}

/// What processing one batch decided
enum BatchDecision {
    /// Keep draining; this many links were handed to the workers
    Continue { dispatched: usize },
    /// The sink was discovered; carries the path to it
    Found(Vec<String>),
}

/// Main coordinator structure
pub struct Coordinator {
    config: Arc<RunConfig>,
    extractor: Arc<dyn LinkExtractor>,
    observers: ObserverRegistry,
    visits: VisitCounter,
}

impl Coordinator {
    /// Creates a coordinator for one run
    ///
    /// Progress is logged through [`TracingObserver`]; more observers can be
    /// added with [`Coordinator::observe_with`].
    pub fn new(config: RunConfig, extractor: Arc<dyn LinkExtractor>) -> Self {
        let mut observers = ObserverRegistry::new();
        observers.register(Arc::new(TracingObserver));

        Self {
            config: Arc::new(config),
            extractor,
            observers,
            visits: VisitCounter::new(),
        }
    }

    /// Registers an additional observer
    pub fn observe_with(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observers.register(observer);
        self
    }

    /// A live handle on this run's visit counter
    pub fn visit_counter(&self) -> VisitCounter {
        self.visits.clone()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the search to completion
    pub async fn run(self) -> Result<CrawlReport, WikiPathError> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Runs the search, unwinding early if `external` is cancelled
    ///
    /// Cancellation, timeout, success and exhaustion all shut down the same
    /// way: the run's token is cancelled, every worker is joined, and only
    /// then are the queues dropped. No worker ever outlives this call.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The run concluded (see [`CrawlOutcome`])
    /// * `Err(WikiPathError)` - A worker task panicked
    pub async fn run_with_cancellation(
        self,
        external: CancellationToken,
    ) -> Result<CrawlReport, WikiPathError> {
        let state = RunState::new(Arc::clone(&self.config), self.visits.clone(), &external);
        let observers: Arc<ObserverRegistry> = Arc::new(self.observers);
        let started = Instant::now();
        let mut stats = RunStats::default();

        tracing::info!(
            "Searching for {} starting at {} with {} workers",
            state.sink(),
            state.source(),
            state.config.thread_count
        );

        let (frontier_tx, mut frontier_rx) =
            mpsc::channel::<Batch>(state.config.frontier_capacity());
        let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel::<String>();

        // Outstanding work: batches the coordinator is still owed. The seed
        // counts as one, every dispatched link as another.
        let mut outstanding: usize = 0;
        if frontier_tx.try_send(Batch::seed(state.source())).is_ok() {
            outstanding += 1;
        }

        let pool = WorkerPool::spawn(
            state.config.thread_count,
            Arc::clone(&self.extractor),
            observers.clone(),
            &state.config.scoping_host,
            dispatch_rx,
            frontier_tx,
            state.cancel.clone(),
        );

        let deadline = state.config.run_timeout.map(|timeout| started + timeout);

        let outcome = loop {
            if outstanding == 0 {
                break CrawlOutcome::Exhausted {
                    visits: state.visits.get(),
                };
            }

            let batch = tokio::select! {
                biased;
                _ = state.cancel.cancelled() => {
                    break CrawlOutcome::Cancelled { visits: state.visits.get() };
                }
                _ = sleep_until_deadline(deadline) => {
                    break CrawlOutcome::TimedOut { visits: state.visits.get() };
                }
                batch = frontier_rx.recv() => batch,
            };

            // Every worker is gone; nothing more can arrive.
            let Some(batch) = batch else {
                break CrawlOutcome::Exhausted {
                    visits: state.visits.get(),
                };
            };
            outstanding -= 1;

            match process_batch(&state, observers.as_ref(), batch, &dispatch_tx, &mut stats) {
                BatchDecision::Found(path) => {
                    break CrawlOutcome::Found {
                        visits: state.visits.get(),
                        path,
                    };
                }
                BatchDecision::Continue { dispatched } => outstanding += dispatched,
            }
        };

        // Shutdown: stop dispatching, cancel in-flight work, wait for every
        // worker, then close the queues.
        state.cancel.cancel();
        drop(dispatch_tx);
        if !pool.is_empty() {
            tracing::debug!("Waiting for {} workers to stop", pool.len());
        }
        let joined = pool.join().await;
        drop(frontier_rx);

        stats.elapsed = started.elapsed();
        joined?;

        tracing::info!("Run finished in {:.2?}: {:?}", stats.elapsed, outcome);
        observers.on_run_complete(&outcome);

        Ok(CrawlReport { outcome, stats })
    }
}

/// Deduplicates one batch and dispatches its new links
///
/// Links are scanned in order. The scan stops at the first new occurrence of
/// the sink; links after it are neither marked nor counted.
fn process_batch(
    state: &RunState,
    observer: &dyn CrawlObserver,
    batch: Batch,
    dispatch: &mpsc::UnboundedSender<String>,
    stats: &mut RunStats,
) -> BatchDecision {
    stats.batches_received += 1;
    if batch.failed {
        stats.extraction_failures += 1;
    }

    let counts_visits = !batch.is_seed();
    let mut discovered = false;
    let mut dispatched = 0;

    for link in batch.links {
        stats.links_scanned += 1;

        if !state
            .visited
            .test_and_mark_from(&link, batch.origin.as_deref())
        {
            stats.duplicates_skipped += 1;
            continue;
        }

        if link == state.sink() {
            let visits = state.visits.get();
            observer.on_sink_found(&link, visits);
            return BatchDecision::Found(state.visited.path_to(&link));
        }

        if counts_visits {
            state.visits.increment();
            discovered = true;
        }

        if dispatch.send(link).is_ok() {
            stats.pages_dispatched += 1;
            dispatched += 1;
        }
    }

    if discovered {
        observer.on_visit_count(state.visits.get());
    }

    BatchDecision::Continue { dispatched }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
