use crate::config::RunConfig;
use crate::state::VisitedSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One page's outbound links, or the seed
///
/// Produced by a worker (or the seeding step) and consumed exactly once by the
/// coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Page the links were extracted from; `None` for the seed batch
    pub origin: Option<String>,

    /// Canonical in-scope links, in document order
    pub links: Vec<String>,

    /// Whether extraction of `origin` failed
    pub failed: bool,
}

impl Batch {
    /// The single-link batch that starts a run
    pub fn seed(source: impl Into<String>) -> Self {
        Self {
            origin: None,
            links: vec![source.into()],
            failed: false,
        }
    }

    /// Links successfully extracted from `origin`
    pub fn expanded(origin: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            links,
            failed: false,
        }
    }

    /// A dead end: extraction of `origin` failed
    pub fn failed(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            links: Vec::new(),
            failed: true,
        }
    }

    pub fn is_seed(&self) -> bool {
        self.origin.is_none()
    }
}

/// Count of distinct newly discovered pages
///
/// Clones share the same counter, so progress can be read from outside the
/// coordinator while a run is in flight.
#[derive(Debug, Clone, Default)]
pub struct VisitCounter {
    count: Arc<AtomicU64>,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one visit and returns the new total
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

/// Everything one run owns besides its queues
///
/// Workers never see this; they only hold queue endpoints, the scoping host
/// and a clone of the cancellation token.
#[derive(Debug)]
pub struct RunState {
    /// The validated run configuration
    pub config: Arc<RunConfig>,

    /// Canonical URL strings discovered so far
    pub visited: VisitedSet,

    /// Distinct non-seed, non-sink pages discovered so far
    pub visits: VisitCounter,

    /// Raised exactly once, when the run concludes
    pub cancel: CancellationToken,
}

impl RunState {
    /// Creates fresh state whose cancellation is a child of `parent`
    ///
    /// Cancelling `parent` unwinds the run; finishing the run never cancels
    /// `parent`. `visits` should be a counter nobody else increments.
    pub fn new(config: Arc<RunConfig>, visits: VisitCounter, parent: &CancellationToken) -> Self {
        Self {
            config,
            visited: VisitedSet::new(),
            visits,
            cancel: parent.child_token(),
        }
    }

    pub fn source(&self) -> &str {
        self.config.source.as_str()
    }

    pub fn sink(&self) -> &str {
        self.config.sink.as_str()
    }
}
