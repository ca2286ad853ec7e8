//! Parsers that turn a court listing page into judgment records.
//!
//! Each source has its own parser implementing [`PageParser`]:
//!
//! | Source | Module | Page shape | Record |
//! |--------|--------|------------|--------|
//! | Lahore High Court | [`lhc`] | table cells with `appjudgments` links | [`ListRecord`](crate::models::ListRecord) |
//! | Supreme Court | [`sc`] | table rows with a `.pdf` link | [`TableRecord`](crate::models::TableRecord) |
//!
//! Parsing is best-effort per item. A parser reports one
//! `Result<Record, ParseError>` per candidate element. [`PageParser::parse`]
//! keeps the successes and only counts and logs the failures, so one
//! malformed row never costs the rest of the page.

pub mod lhc;
pub mod sc;

use crate::error::ParseError;
use crate::models::Record;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

pub use lhc::LhcParser;
pub use sc::ScParser;

pub(crate) static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Records extracted from one page, plus how many candidates were dropped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParseReport {
    pub records: Vec<Record>,
    pub skipped: usize,
}

impl ParseReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Source-specific extraction of judgment records from raw HTML.
pub trait PageParser {
    /// Short source name used in log fields.
    fn source(&self) -> &'static str;

    /// One outcome per candidate element, in document order.
    ///
    /// Relative links are resolved against `base`.
    fn parse_items(&self, html: &str, base: &Url) -> Vec<Result<Record, ParseError>>;

    /// Parse a page, keeping good records and counting bad ones.
    fn parse(&self, html: &str, base: &Url) -> ParseReport {
        let mut report = ParseReport::default();
        for (index, item) in self.parse_items(html, base).into_iter().enumerate() {
            match item {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    debug!(source = self.source(), index, error = %e, "Skipping item");
                    report.skipped += 1;
                }
            }
        }
        info!(
            source = self.source(),
            count = report.records.len(),
            skipped = report.skipped,
            "Parsed judgments"
        );
        report
    }
}

/// Which parser a configured source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Lhc,
    Sc,
}

impl ParserKind {
    pub fn parser(self) -> Box<dyn PageParser> {
        match self {
            ParserKind::Lhc => Box::new(LhcParser),
            ParserKind::Sc => Box::new(ScParser),
        }
    }

    /// Number of columns the records of this parser render to.
    pub fn column_count(self) -> usize {
        match self {
            ParserKind::Lhc => 2,
            ParserKind::Sc => 7,
        }
    }
}

/// Nearest ancestor element with the given tag name.
pub(crate) fn enclosing<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == tag)
}

/// Text nodes below `element`, each trimmed, empty ones dropped, joined
/// with single spaces. Whitespace inside a text node is kept as-is.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" ")
}

pub(crate) fn resolve_link(base: &Url, href: &str) -> Result<String, ParseError> {
    base.join(href.trim())
        .map(|u| u.to_string())
        .map_err(|e| ParseError::BadLink {
            href: href.to_string(),
            reason: e.to_string(),
        })
}
