use crate::config::validation::validate_run_config;
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Host every node of the reference deployment lives on
pub const WIKIPEDIA_HOST: &str = "en.wikipedia.org";

/// Page the search starts from when none is given
pub const DEFAULT_SOURCE: &str = "https://en.wikipedia.org/wiki/Knowledge";

/// Page the search looks for when none is given
pub const DEFAULT_SINK: &str = "https://en.wikipedia.org/wiki/Philosophy";

/// Worker count used when none is given
pub const DEFAULT_THREAD_COUNT: usize = 3;

/// Inclusive lower bound on the worker count
pub const MIN_THREADS: usize = 1;

/// Inclusive upper bound on the worker count
pub const MAX_THREADS: usize = 10;

/// Per-page fetch budget
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Frontier queue slots per worker
pub const FRONTIER_SLOTS_PER_WORKER: usize = 4;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "wikipaths/",
    env!("CARGO_PKG_VERSION"),
    " (link path finder)"
);

/// Optional TOML configuration file
///
/// Every value is optional; anything missing falls back to the command line
/// or to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub search: SearchSection,

    #[serde(default)]
    pub http: HttpSection,
}

/// `[search]` table: what to look for and how hard
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SearchSection {
    /// Page to start from
    pub source: Option<String>,

    /// Page to find
    pub sink: Option<String>,

    /// Number of concurrent workers
    pub concurrency: Option<usize>,

    /// Site every node must live on
    pub scoping_host: Option<String>,

    /// Give up after this many seconds
    pub run_timeout_secs: Option<u64>,
}

/// `[http]` table: how pages are fetched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HttpSection {
    /// Per-page fetch budget in milliseconds
    pub fetch_timeout_ms: Option<u64>,

    /// User-Agent header sent with every request
    pub user_agent: Option<String>,
}

/// Validated, immutable configuration of one search run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Canonical source page
    pub source: Url,

    /// Canonical sink page
    pub sink: Url,

    /// Number of workers, within `MIN_THREADS..=MAX_THREADS`
    pub thread_count: usize,

    /// Site every node must live on
    pub scoping_host: String,

    /// Per-page fetch budget
    pub fetch_timeout: Duration,

    /// Optional bound on the whole run
    pub run_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl RunConfig {
    /// Starts a builder populated with nothing but defaults
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Capacity of the frontier queue for this run
    pub fn frontier_capacity(&self) -> usize {
        self.thread_count * FRONTIER_SLOTS_PER_WORKER
    }
}

/// Builder for [`RunConfig`]; validation happens in [`RunConfigBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    pub(crate) source: Option<String>,
    pub(crate) sink: Option<String>,
    pub(crate) thread_count: Option<usize>,
    pub(crate) scoping_host: Option<String>,
    pub(crate) fetch_timeout: Option<Duration>,
    pub(crate) run_timeout: Option<Duration>,
    pub(crate) user_agent: Option<String>,
}

impl RunConfigBuilder {
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn sink(mut self, sink: impl Into<String>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    pub fn thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = Some(thread_count);
        self
    }

    pub fn scoping_host(mut self, host: impl Into<String>) -> Self {
        self.scoping_host = Some(host.into());
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fills every value still unset from a configuration file
    pub fn with_file_defaults(mut self, file: &FileConfig) -> Self {
        let search = &file.search;
        self.source = self.source.or_else(|| search.source.clone());
        self.sink = self.sink.or_else(|| search.sink.clone());
        self.thread_count = self.thread_count.or(search.concurrency);
        self.scoping_host = self.scoping_host.or_else(|| search.scoping_host.clone());
        self.run_timeout = self
            .run_timeout
            .or(search.run_timeout_secs.map(Duration::from_secs));
        self.fetch_timeout = self
            .fetch_timeout
            .or(file.http.fetch_timeout_ms.map(Duration::from_millis));
        self.user_agent = self.user_agent.or_else(|| file.http.user_agent.clone());
        self
    }

    /// Validates the collected values and produces the run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(RunConfig)` - Every value is valid
    /// * `Err(ConfigError)` - A URL failed to parse or left the scoping host,
    ///   the worker count is out of range, or a timeout is zero
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        validate_run_config(self)
    }
}
