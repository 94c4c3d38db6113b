//! Wikipaths main entry point
//!
//! This is the command-line interface for the Wikipaths path finder.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wikipaths::config::{load_config, RunConfig, DEFAULT_SINK, DEFAULT_SOURCE};
use wikipaths::crawler::{Coordinator, CrawlOutcome, HttpLinkExtractor};
use wikipaths::output::print_report;

/// Exit status when the search space was exhausted
const EXIT_EXHAUSTED: u8 = 1;

/// Exit status for configuration errors; no run was started
const EXIT_CONFIG: u8 = 2;

/// Exit status when the search itself failed (client setup, worker crash)
const EXIT_FAILURE: u8 = 3;

/// Exit status when the run was interrupted or timed out
const EXIT_INTERRUPTED: u8 = 130;

/// Wikipaths: find a link path between two pages of one site
///
/// Wikipaths expands pages breadth-first with a fixed pool of workers,
/// following only links on the scoping host, until the sink page is found or
/// every reachable page has been explored.
#[derive(Parser, Debug)]
#[command(name = "wikipaths")]
#[command(version)]
#[command(about = "Find a link path between two pages of one site", long_about = None)]
struct Cli {
    /// Page to start from
    #[arg(long, value_name = "URL", help = format!("Page to start from [default: {}]", DEFAULT_SOURCE))]
    source: Option<String>,

    /// Page to find
    #[arg(long, value_name = "URL", help = format!("Page to find [default: {}]", DEFAULT_SINK))]
    sink: Option<String>,

    /// Number of concurrent workers (1-10) [default: 3]
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Site every page must live on [default: en.wikipedia.org]
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match search(config, cli.quiet).await {
        Ok(outcome) => ExitCode::from(exit_status(&outcome)),
        Err(e) => {
            tracing::error!("Search failed: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Runs one search until it concludes or Ctrl-C is pressed
async fn search(config: RunConfig, quiet: bool) -> anyhow::Result<CrawlOutcome> {
    let extractor =
        HttpLinkExtractor::from_config(&config).context("failed to build HTTP client")?;

    // Ctrl-C unwinds the run the same way success does.
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, shutting down workers");
            interrupt.cancel();
        }
    });

    let report = Coordinator::new(config, Arc::new(extractor))
        .run_with_cancellation(cancel)
        .await
        .context("worker pool failed")?;

    if !quiet {
        print_report(&report);
    }

    Ok(report.outcome)
}

fn exit_status(outcome: &CrawlOutcome) -> u8 {
    match outcome {
        CrawlOutcome::Found { .. } => 0,
        CrawlOutcome::Exhausted { .. } => EXIT_EXHAUSTED,
        CrawlOutcome::Cancelled { .. } | CrawlOutcome::TimedOut { .. } => EXIT_INTERRUPTED,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wikipaths=info,warn"),
            1 => EnvFilter::new("wikipaths=debug,info"),
            2 => EnvFilter::new("wikipaths=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges command-line flags over the optional configuration file
fn build_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut builder = RunConfig::builder();

    if let Some(source) = &cli.source {
        builder = builder.source(source);
    }
    if let Some(sink) = &cli.sink {
        builder = builder.sink(sink);
    }
    if let Some(concurrency) = cli.concurrency {
        builder = builder.thread_count(concurrency);
    }
    if let Some(host) = &cli.host {
        builder = builder.scoping_host(host);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.run_timeout(Duration::from_secs(secs));
    }

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
        let file = load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        builder = builder.with_file_defaults(&file);
    }

    Ok(builder.build()?)
}
