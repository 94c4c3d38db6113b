//! Worker pool: bounded-parallel expansion of dispatched pages
//!
//! Exactly `thread_count` long-lived tasks share the dispatch queue. Each one
//! takes a link, extracts its outbound links and pushes the resulting batch
//! onto the frontier queue. Every suspension point (waiting for a link,
//! extracting, delivering a batch) is raced against the run's cancellation
//! token, so workers stop promptly once the coordinator concludes.

use crate::crawler::LinkExtractor;
use crate::output::CrawlObserver;
use crate::state::Batch;
use crate::ExtractError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Shared receiving end of the dispatch queue
pub type DispatchReceiver = Arc<Mutex<mpsc::UnboundedReceiver<String>>>;

/// What one worker holds: queue endpoints, the scoping host, and the
/// collaborators it calls. Never the visited set.
#[derive(Clone)]
struct WorkerContext {
    extractor: Arc<dyn LinkExtractor>,
    observer: Arc<dyn CrawlObserver>,
    scoping_host: Arc<str>,
    dispatch: DispatchReceiver,
    frontier: mpsc::Sender<Batch>,
    cancel: CancellationToken,
}

/// A fixed set of running workers
pub struct WorkerPool {
    workers: JoinSet<()>,
}

impl WorkerPool {
    /// Spawns `thread_count` workers
    ///
    /// The pool takes ownership of the frontier sender; the frontier queue
    /// closes once the last worker has stopped.
    pub fn spawn(
        thread_count: usize,
        extractor: Arc<dyn LinkExtractor>,
        observer: Arc<dyn CrawlObserver>,
        scoping_host: &str,
        dispatch: mpsc::UnboundedReceiver<String>,
        frontier: mpsc::Sender<Batch>,
        cancel: CancellationToken,
    ) -> Self {
        let context = WorkerContext {
            extractor,
            observer,
            scoping_host: Arc::from(scoping_host),
            dispatch: Arc::new(Mutex::new(dispatch)),
            frontier,
            cancel,
        };

        let mut workers = JoinSet::new();
        for worker_id in 0..thread_count {
            workers.spawn(run_worker(worker_id, context.clone()));
        }
        tracing::debug!("Spawned {} workers", thread_count);

        Self { workers }
    }

    /// Number of workers still running
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Waits for every worker to stop
    ///
    /// Callers cancel the run first; workers then exit at their next
    /// suspension point. A panicking worker is reported once all others have
    /// been joined.
    pub async fn join(mut self) -> Result<(), JoinError> {
        let mut first_error = None;
        while let Some(result) = self.workers.join_next().await {
            if let Err(e) = result {
                tracing::error!("Worker task failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn run_worker(worker_id: usize, ctx: WorkerContext) {
    tracing::trace!("Worker {} started", worker_id);

    loop {
        let link = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => break,
            link = next_link(&ctx.dispatch) => match link {
                Some(link) => link,
                None => break,
            },
        };

        // A link may have been handed over just as the run concluded.
        if ctx.cancel.is_cancelled() {
            break;
        }

        ctx.observer.on_crawling(&link);

        // Extraction runs in its own task so a panic still pays back the
        // batch the coordinator is owed.
        let mut extraction = tokio::spawn(extract(
            Arc::clone(&ctx.extractor),
            link.clone(),
            Arc::clone(&ctx.scoping_host),
        ));
        let result = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                extraction.abort();
                break;
            }
            joined = &mut extraction => joined.unwrap_or_else(|e| {
                Err(ExtractError::Panicked {
                    url: link.clone(),
                    reason: e.to_string(),
                })
            }),
        };

        let batch = match result {
            Ok(links) => Batch::expanded(link, links),
            Err(e) => {
                ctx.observer.on_extraction_error(&link, &e);
                Batch::failed(link)
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => break,
            sent = ctx.frontier.send(batch) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    tracing::trace!("Worker {} stopped", worker_id);
}

async fn extract(
    extractor: Arc<dyn LinkExtractor>,
    link: String,
    scoping_host: Arc<str>,
) -> Result<Vec<String>, ExtractError> {
    extractor.extract(&link, &scoping_host).await
}

async fn next_link(dispatch: &DispatchReceiver) -> Option<String> {
    dispatch.lock().await.recv().await
}
