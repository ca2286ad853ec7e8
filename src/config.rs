//! Run configuration: which pages to fetch and where their ledgers live.
//!
//! [`Config::default`] describes the two court sources this tool was built
//! for. A YAML file with the same shape can replace it:
//!
//! ```yaml
//! fetch_timeout_secs: 30
//! sources:
//!   - name: lhc
//!     url: https://data.lhc.gov.pk/reported_judgments/judgments_approved_for_reporting
//!     parser: lhc
//!     ledger_path: lhc_judgments.md
//!     title: LHC Reported Judgments
//!     header_columns: [Description, Link]
//! ```

use crate::scrapers::ParserKind;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const LHC_URL: &str =
    "https://data.lhc.gov.pk/reported_judgments/judgments_approved_for_reporting";
pub const SC_URL: &str = "https://www.supremecourt.gov.pk/latest-judgements/";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    pub sources: Vec<SourceConfig>,
}

/// One page to watch and the ledger it feeds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Label used in logs and the run summary.
    pub name: String,
    pub url: String,
    pub parser: ParserKind,
    /// Ledger file; relative paths are resolved against the output directory.
    pub ledger_path: PathBuf,
    pub title: String,
    pub header_columns: Vec<String>,
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            sources: vec![
                SourceConfig {
                    name: "lhc".to_string(),
                    url: LHC_URL.to_string(),
                    parser: ParserKind::Lhc,
                    ledger_path: PathBuf::from("lhc_judgments.md"),
                    title: "LHC Reported Judgments".to_string(),
                    header_columns: columns(&["Description", "Link"]),
                },
                SourceConfig {
                    name: "sc".to_string(),
                    url: SC_URL.to_string(),
                    parser: ParserKind::Sc,
                    ledger_path: PathBuf::from("sc_judgments.md"),
                    title: "Supreme Court Latest Judgments".to_string(),
                    header_columns: columns(&[
                        "Sr", "Subject", "Case No", "Title", "Judge", "Uploaded", "Link",
                    ]),
                },
            ],
        }
    }
}

impl Config {
    /// Load a YAML config, or the built-in defaults when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)
                    .map_err(|e| format!("failed to read config {}: {}", p.display(), e))?;
                let config: Config = serde_yaml::from_str(&text)?;
                info!(path = %p.display(), sources = config.sources.len(), "Loaded configuration");
                config
            }
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject sources whose header does not fit the records their parser emits.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        for source in &self.sources {
            let expected = source.parser.column_count();
            if source.header_columns.len() != expected {
                return Err(format!(
                    "source {} has {} header columns but its parser produces {}",
                    source.name,
                    source.header_columns.len(),
                    expected
                )
                .into());
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Resolve every relative ledger path against `dir`.
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        for source in &mut self.sources {
            if source.ledger_path.is_relative() {
                source.ledger_path = dir.join(&source.ledger_path);
            }
        }
        self
    }
}
