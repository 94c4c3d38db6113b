//! Configuration module for Wikipaths
//!
//! A run is described by a [`RunConfig`], assembled with [`RunConfig::builder`]
//! from command-line values and, optionally, a TOML file. Validation happens
//! once, in [`RunConfigBuilder::build`], before any run starts.
//!
//! # Example
//!
//! ```
//! use wikipaths::config::RunConfig;
//!
//! let config = RunConfig::builder()
//!     .source("https://en.wikipedia.org/wiki/Knowledge")
//!     .sink("https://en.wikipedia.org/wiki/Philosophy")
//!     .thread_count(4)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.thread_count, 4);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    FileConfig, HttpSection, RunConfig, RunConfigBuilder, SearchSection, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_SINK, DEFAULT_SOURCE, DEFAULT_THREAD_COUNT, DEFAULT_USER_AGENT, MAX_THREADS,
    MIN_THREADS, WIKIPEDIA_HOST,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
