//! Append-only markdown ledger of judgments.
//!
//! A ledger is one markdown file per source:
//!
//! ```text
//! # LHC Reported Judgments
//!
//! Last Updated: 2025-05-06 08:00:00
//!
//! | Description | Link |
//! | --- | --- |
//! | newest row | [Link](https://...) |
//! | older row | [Link](https://...) |
//! ```
//!
//! # Merge rules
//!
//! - The header and separator rows are written once, when the file is created.
//! - New rows go directly below the separator, in the order they were parsed,
//!   so the table reads newest-first. Existing rows are never rewritten.
//! - A record is already present if its fingerprint (case number, or the first
//!   50 characters of the description) occurs anywhere in the file text.
//!   Records in the same batch are only checked against the file, not against
//!   each other.
//! - `Last Updated:` changes only when at least one row is added; a run that
//!   adds nothing leaves the file byte-for-byte unchanged.
//! - The file is replaced atomically through a temp file in the same directory.

use crate::error::LedgerError;
use crate::models::Record;
use crate::utils::{escape_cell, format_timestamp};
use chrono::{Local, NaiveDateTime};
use itertools::Itertools;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

const TIMESTAMP_PREFIX: &str = "Last Updated:";

/// A ledger file bound to its title and table header.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
    title: String,
    header_columns: Vec<String>,
}

impl LedgerStore {
    pub fn new(
        path: impl Into<PathBuf>,
        title: impl Into<String>,
        header_columns: Vec<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            header_columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `records` into the ledger, stamping it with the local time.
    ///
    /// Returns the number of rows actually added.
    pub fn merge(&self, records: &[Record]) -> Result<usize, LedgerError> {
        self.merge_at(records, Local::now().naive_local())
    }

    /// Merge `records` into the ledger using `now` for the timestamp.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ColumnMismatch`] if a record does not have one cell per
    ///   header column. Nothing is written in that case.
    /// - [`LedgerError::Read`] / [`LedgerError::Write`] on I/O failure. The
    ///   previous ledger content survives a failed write.
    #[instrument(
        level = "info",
        skip_all,
        fields(path = %self.path.display(), incoming = records.len())
    )]
    pub fn merge_at(&self, records: &[Record], now: NaiveDateTime) -> Result<usize, LedgerError> {
        if records.is_empty() {
            debug!("No records passed to merge");
            return Ok(0);
        }
        self.check_columns(records)?;

        let existing = load(&self.path)?;
        let fresh: Vec<&Record> = records
            .iter()
            .filter(|r| {
                let present = is_duplicate(r, &existing);
                if present {
                    debug!(record = %r, link = r.link(), "Already in ledger");
                }
                !present
            })
            .collect();
        if fresh.is_empty() {
            info!("No new entries after deduplication");
            return Ok(0);
        }

        let stamp = format_timestamp(&now);
        let mut doc = if existing.trim().is_empty() {
            self.preamble(&stamp)
        } else {
            existing
        };

        let rows: Vec<String> = fresh.iter().map(|r| render(r)).collect();
        insert_rows(&mut doc, &rows);
        set_timestamp(&mut doc, &stamp);

        write_atomic(&self.path, &doc).map_err(|source| LedgerError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        info!(added = rows.len(), "Updated ledger");
        Ok(rows.len())
    }

    fn check_columns(&self, records: &[Record]) -> Result<(), LedgerError> {
        let expected = self.header_columns.len();
        match records.iter().map(|r| r.cells().len()).find(|n| *n != expected) {
            Some(found) => Err(LedgerError::ColumnMismatch {
                path: self.path.display().to_string(),
                expected,
                found,
            }),
            None => Ok(()),
        }
    }

    /// Title, timestamp, header and separator for a new ledger.
    fn preamble(&self, stamp: &str) -> String {
        let header = self.header_columns.iter().map(|c| escape_cell(c)).join(" | ");
        let separator = std::iter::repeat_n("---", self.header_columns.len()).join(" | ");
        format!(
            "# {}\n\n{} {}\n\n| {} |\n| {} |\n",
            self.title, TIMESTAMP_PREFIX, stamp, header, separator
        )
    }
}

/// Read the whole ledger, or an empty string if it does not exist yet.
pub fn load(path: &Path) -> Result<String, LedgerError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(LedgerError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Whether `record` already appears somewhere in `existing`.
///
/// Plain substring search: a case number that is contained in a longer,
/// unrelated case number also counts as present. The fingerprint is looked
/// up both as rendered here (pipes escaped) and raw, since older ledgers
/// were written without escaping.
pub fn is_duplicate(record: &Record, existing: &str) -> bool {
    record.fingerprint().is_some_and(|fp| {
        existing.contains(fp.as_str()) || existing.contains(&escape_cell(&fp))
    })
}

/// Render a record as one markdown table row, without a line terminator.
pub fn render(record: &Record) -> String {
    format!(
        "| {} |",
        record.cells().iter().map(|c| escape_cell(c)).join(" | ")
    )
}

/// Byte range of the first line matching `pred`, including its terminator.
/// `pred` sees the line without the terminator.
fn find_line(doc: &str, pred: impl Fn(&str) -> bool) -> Option<(usize, usize)> {
    let mut start = 0;
    for line in doc.split_inclusive('\n') {
        let end = start + line.len();
        if pred(line.trim_end_matches(['\r', '\n'])) {
            return Some((start, end));
        }
        start = end;
    }
    None
}

/// A markdown table separator row such as `| --- | --- |` or `|:---|---:|`.
fn is_separator_row(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('|')
        && line.contains('-')
        && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn insert_rows(doc: &mut String, rows: &[String]) {
    match find_line(doc, is_separator_row) {
        Some((start, end)) => {
            let line = &doc[start..end];
            let eol = if line.ends_with("\r\n") { "\r\n" } else { "\n" };
            let mut block = String::new();
            if !line.ends_with('\n') {
                block.push_str(eol);
            }
            for row in rows {
                block.push_str(row);
                block.push_str(eol);
            }
            doc.insert_str(end, &block);
        }
        None => {
            debug!("No separator row found; appending rows at end of ledger");
            if !doc.is_empty() && !doc.ends_with('\n') {
                doc.push('\n');
            }
            for row in rows {
                doc.push_str(row);
                doc.push('\n');
            }
        }
    }
}

fn set_timestamp(doc: &mut String, stamp: &str) {
    if let Some((start, end)) = find_line(doc, |l| l.starts_with(TIMESTAMP_PREFIX)) {
        let content_end = start + doc[start..end].trim_end_matches(['\r', '\n']).len();
        doc.replace_range(start..content_end, &format!("{} {}", TIMESTAMP_PREFIX, stamp));
    }
}

/// Replace `path` with `contents` via a synced temp file and a rename.
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
