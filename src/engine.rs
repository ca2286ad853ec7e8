//! The incremental update pipeline.
//!
//! For every configured source, in order:
//! 1. **Fetch** the listing page (one attempt)
//! 2. **Parse** it into records
//! 3. **Merge** the unseen records into the source's ledger
//!
//! Each source is isolated: a fetch failure, an empty page or a failed write
//! is logged and recorded in the [`RunReport`], and the next source still runs.

use crate::config::{Config, SourceConfig};
use crate::fetch::PageFetcher;
use crate::outputs::ledger::LedgerStore;
use crate::scrapers::PageParser;
use crate::utils::truncate_for_log;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Characters of HTML logged when a page yields no records.
const EMPTY_PAGE_SNIPPET_CHARS: usize = 1000;

/// What happened to one source during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Rows were added to the ledger.
    Updated(usize),
    /// Records were parsed but all were already in the ledger.
    UpToDate,
    /// The page was fetched but nothing on it matched.
    NoRecords,
    FetchFailed,
    WriteFailed,
}

impl SourceOutcome {
    pub fn rows_added(self) -> usize {
        match self {
            SourceOutcome::Updated(n) => n,
            _ => 0,
        }
    }
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOutcome::Updated(n) => write!(f, "added {} new entries", n),
            SourceOutcome::UpToDate => f.write_str("no new entries"),
            SourceOutcome::NoRecords => f.write_str("page parsed to zero records"),
            SourceOutcome::FetchFailed => f.write_str("fetch failed"),
            SourceOutcome::WriteFailed => f.write_str("ledger update failed"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<(String, SourceOutcome)>,
}

impl RunReport {
    pub fn rows_added(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.rows_added()).sum()
    }
}

/// A configured source with its parser and ledger resolved.
struct Source {
    name: String,
    url: String,
    parser: Box<dyn PageParser>,
    ledger: LedgerStore,
}

impl From<&SourceConfig> for Source {
    fn from(c: &SourceConfig) -> Self {
        Self {
            name: c.name.clone(),
            url: c.url.clone(),
            parser: c.parser.parser(),
            ledger: LedgerStore::new(&c.ledger_path, &c.title, c.header_columns.clone()),
        }
    }
}

pub struct UpdateEngine<F> {
    fetcher: F,
    sources: Vec<Source>,
}

impl<F: PageFetcher> UpdateEngine<F> {
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            fetcher,
            sources: config.sources.iter().map(Source::from).collect(),
        }
    }

    /// Run every source once, sequentially.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        for source in &self.sources {
            let outcome = self.update_source(source).await;
            info!(source = %source.name, %outcome, "Source finished");
            report.outcomes.push((source.name.clone(), outcome));
        }
        report
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name, url = %source.url))]
    async fn update_source(&self, source: &Source) -> SourceOutcome {
        info!("Fetching judgments");
        let html = match self.fetcher.fetch(&source.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Fetch failed; skipping source");
                return SourceOutcome::FetchFailed;
            }
        };

        let base = match Url::parse(&source.url) {
            Ok(base) => base,
            Err(e) => {
                error!(error = %e, "Source URL is not a valid base for links");
                return SourceOutcome::FetchFailed;
            }
        };

        let report = source.parser.parse(&html, &base);
        if report.is_empty() {
            warn!(skipped = report.skipped, "Parsing found 0 judgments; ledger left untouched");
            debug!(snippet = %truncate_for_log(&html, EMPTY_PAGE_SNIPPET_CHARS), "Page snippet");
            return SourceOutcome::NoRecords;
        }

        match source.ledger.merge(&report.records) {
            Ok(0) => {
                info!(
                    path = %source.ledger.path().display(),
                    "No new entries after deduplication"
                );
                SourceOutcome::UpToDate
            }
            Ok(added) => {
                info!(
                    path = %source.ledger.path().display(),
                    added,
                    "Updated ledger with new entries"
                );
                SourceOutcome::Updated(added)
            }
            Err(e) => {
                error!(error = %e, "Ledger update failed");
                SourceOutcome::WriteFailed
            }
        }
    }
}
