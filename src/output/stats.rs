//! Run statistics
//!
//! Counters kept by the coordinator while draining the frontier, reported
//! alongside the outcome once the run has stopped.

use std::time::Duration;

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Batches drained from the frontier, the seed included
    pub batches_received: u64,

    /// Links examined across all batches
    pub links_scanned: u64,

    /// Links skipped because they had been seen before
    pub duplicates_skipped: u64,

    /// Links handed to the worker pool
    pub pages_dispatched: u64,

    /// Pages whose extraction failed and became dead ends
    pub extraction_failures: u64,

    /// Wall-clock time from seeding to the last worker stopping
    pub elapsed: Duration,
}

impl RunStats {
    /// Pages expanded per second over the whole run
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.batches_received.saturating_sub(1) as f64 / secs
        } else {
            0.0
        }
    }

    /// Share of scanned links that were already known, as a percentage
    pub fn duplicate_rate(&self) -> f64 {
        if self.links_scanned > 0 {
            (self.duplicates_skipped as f64 / self.links_scanned as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    println!("=== Run Statistics ===\n");
    println!("  Pages dispatched: {}", stats.pages_dispatched);
    println!("  Batches received: {}", stats.batches_received);
    println!(
        "  Links scanned: {} ({:.1}% duplicates)",
        stats.links_scanned,
        stats.duplicate_rate()
    );
    println!("  Extraction failures: {}", stats.extraction_failures);
    println!(
        "  Elapsed: {:.2?} ({:.2} pages/sec)",
        stats.elapsed,
        stats.pages_per_second()
    );
}
