//! State module for tracking search progress
//!
//! # Components
//!
//! - `VisitedSet`: exactly-once discovery of canonical URLs
//! - `VisitCounter`: distinct pages discovered so far
//! - `Batch`: one page's outbound links on their way back to the coordinator
//! - `RunState`: the per-run bundle owned by the coordinator

mod run_state;
mod visited;

// Re-export main types
pub use run_state::{Batch, RunState, VisitCounter};
pub use visited::VisitedSet;
