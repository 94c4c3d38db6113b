//! Terminal reporting of a finished run

use crate::crawler::{CrawlOutcome, CrawlReport};
use crate::output::stats::print_statistics;

/// One-line summary of an outcome
pub fn format_outcome(outcome: &CrawlOutcome) -> String {
    match outcome {
        CrawlOutcome::Found { visits, path } => format!(
            "Found sink after {} visits ({} clicks)",
            visits,
            path.len().saturating_sub(1)
        ),
        CrawlOutcome::Exhausted { visits } => format!(
            "No path found: explored {} pages without reaching the sink",
            visits
        ),
        CrawlOutcome::Cancelled { visits } => {
            format!("Search cancelled after {} visits", visits)
        }
        CrawlOutcome::TimedOut { visits } => {
            format!("Search timed out after {} visits", visits)
        }
    }
}

/// Prints the outcome, the discovered path, and run statistics to stdout
pub fn print_report(report: &CrawlReport) {
    println!("{}", format_outcome(&report.outcome));

    if let CrawlOutcome::Found { path, .. } = &report.outcome {
        println!();
        for (step, url) in path.iter().enumerate() {
            println!("  {:>3}. {}", step, url);
        }
    }

    println!();
    print_statistics(&report.stats);
}
