//! Error types for the fetch, parse and ledger stages.
//!
//! Each stage has its own error so the engine can decide locally what a
//! failure means: a [`FetchError`] skips a source, a [`ParseError`] drops a
//! single item, and a [`LedgerError`] aborts only that source's update.

use thiserror::Error;

/// Failure to retrieve a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Why a single candidate element on a page did not yield a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("link is not inside a <{0}> element")]
    NoEnclosingElement(&'static str),

    #[error("row has {0} cells, expected at least 4")]
    TooFewCells(usize),

    #[error("field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("could not resolve link {href:?}: {reason}")]
    BadLink { href: String, reason: String },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write ledger {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("record renders {found} columns but ledger {path} has {expected}")]
    ColumnMismatch {
        path: String,
        expected: usize,
        found: usize,
    },
}
