//! # Judgment Ledger
//!
//! Watches court judgment listings and keeps an append-only markdown ledger
//! of every judgment seen, one file per court.
//!
//! ## Sources
//!
//! - Lahore High Court: judgments approved for reporting
//! - Supreme Court of Pakistan: latest judgements
//!
//! ## Usage
//!
//! ```sh
//! judgment_ledger -o ./ledgers
//! ```
//!
//! Intended to be run on a schedule. Each run is one pass:
//! 1. **Fetching**: download each source's listing page (single attempt)
//! 2. **Parsing**: extract judgment records, skipping malformed items
//! 3. **Merging**: insert only unseen records at the top of the ledger
//!
//! A source that cannot be fetched, parses to nothing, or fails to write is
//! logged and skipped; the run still exits successfully.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod engine;
mod error;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::Config;
use engine::UpdateEngine;
use fetch::HttpFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("judgment_ledger starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref())?.with_output_dir(&args.output_dir);
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    let engine = UpdateEngine::new(fetcher, &config);

    let report = engine.run().await;
    for (source, outcome) in &report.outcomes {
        info!(%source, %outcome, "Summary");
    }

    let elapsed = start_time.elapsed();
    info!(
        rows_added = report.rows_added(),
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
