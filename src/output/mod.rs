//! Output module: the observability side-channel and end-of-run reporting
//!
//! This module handles:
//! - Progress events through [`CrawlObserver`] (logged via `tracing` by default)
//! - Run statistics
//! - The terminal message printed by the CLI

mod observer;
mod report;
pub mod stats;

pub use observer::{CrawlObserver, ObserverRegistry, TracingObserver};
pub use report::{format_outcome, print_report};
pub use stats::{print_statistics, RunStats};
