//! Command-line interface definitions for the judgment ledger.
//!
//! Both arguments are optional; with none, the built-in court sources are
//! fetched and their ledgers written to the current directory.

use clap::Parser;
use std::path::PathBuf;

/// Fetch the latest court judgments and append unseen ones to markdown ledgers.
///
/// # Examples
///
/// ```sh
/// # Update ./lhc_judgments.md and ./sc_judgments.md
/// judgment_ledger
///
/// # Write ledgers elsewhere, with a custom source list
/// judgment_ledger -o ./ledgers -c sources.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML file replacing the built-in sources
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory that relative ledger paths are resolved against
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["judgment_ledger"]);
        assert_eq!(cli.config, None);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "judgment_ledger",
            "-c",
            "/tmp/sources.yaml",
            "-o",
            "/tmp/ledgers",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sources.yaml")));
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/ledgers"));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from(["judgment_ledger", "--output-dir", "out"]);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
    }
}
