//! Lahore High Court "judgments approved for reporting" parser.
//!
//! The listing is a table whose cells each hold a free-text description of
//! a judgment (case number, parties, bench, date) together with a link into
//! the `appjudgments` document store. Every such link becomes one
//! [`ListRecord`] whose description is the text of the enclosing cell.

use super::{LINK_SELECTOR, PageParser, element_text, enclosing, resolve_link};
use crate::error::ParseError;
use crate::models::{ListRecord, Record};
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html};
use url::Url;

/// Marker that identifies judgment document links on the LHC page.
const JUDGMENT_HREF_MARKER: &str = "appjudgments";

#[derive(Debug, Default, Clone, Copy)]
pub struct LhcParser;

impl PageParser for LhcParser {
    fn source(&self) -> &'static str {
        "lhc"
    }

    fn parse_items(&self, html: &str, base: &Url) -> Vec<Result<Record, ParseError>> {
        let document = Html::parse_document(html);
        document
            .select(&LINK_SELECTOR)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                href.to_lowercase()
                    .contains(JUDGMENT_HREF_MARKER)
                    .then(|| parse_link(a, href, base))
            })
            .collect()
    }
}

fn parse_link(a: ElementRef<'_>, href: &str, base: &Url) -> Result<Record, ParseError> {
    let td = enclosing(a, "td").ok_or(ParseError::NoEnclosingElement("td"))?;
    let description = collapse_whitespace(&element_text(td));
    if description.is_empty() {
        return Err(ParseError::EmptyField("description"));
    }
    let link = resolve_link(base, href)?;
    Ok(Record::List(ListRecord { description, link }))
}
