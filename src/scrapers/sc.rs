//! Supreme Court of Pakistan "latest judgements" parser.
//!
//! The page lists judgments as table rows. A row is a judgment if it holds a
//! link to a PDF; its cells are read positionally as
//! serial / subject / case no. / title / judge / upload date.
//!
//! Cells are every `td`/`th` below the row, nested ones included, and their
//! text is kept with inner spacing intact. Case numbers already in a ledger
//! were recorded that way, so normalising them would defeat deduplication.

use super::{LINK_SELECTOR, PageParser, element_text, enclosing, resolve_link};
use crate::error::ParseError;
use crate::models::{Record, TableRecord, UPLOADED_MISSING};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());

/// Rows with fewer cells than this are navigation or layout, not judgments.
const MIN_CELLS: usize = 4;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScParser;

impl PageParser for ScParser {
    fn source(&self) -> &'static str {
        "sc"
    }

    fn parse_items(&self, html: &str, base: &Url) -> Vec<Result<Record, ParseError>> {
        let document = Html::parse_document(html);
        document
            .select(&LINK_SELECTOR)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                href.to_lowercase()
                    .contains(".pdf")
                    .then(|| parse_row(a, href, base))
            })
            .collect()
    }
}

fn parse_row(a: ElementRef<'_>, href: &str, base: &Url) -> Result<Record, ParseError> {
    let tr = enclosing(a, "tr").ok_or(ParseError::NoEnclosingElement("tr"))?;
    let cells: Vec<String> = tr.select(&CELL_SELECTOR).map(element_text).collect();
    if cells.len() < MIN_CELLS {
        return Err(ParseError::TooFewCells(cells.len()));
    }

    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
    Ok(Record::Table(TableRecord {
        serial: cell(0),
        subject: cell(1),
        case_no: cell(2),
        title: cell(3),
        judge: cell(4),
        uploaded: cells
            .get(5)
            .cloned()
            .unwrap_or_else(|| UPLOADED_MISSING.to_string()),
        link: resolve_link(base, href)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <table id="judgments">
          <tr><th>Sr</th><th>Subject</th><th>Case No</th><th>Title</th><th>Judge</th><th>Uploaded</th><th>Download</th></tr>
          <tr>
            <td>1</td>
            <td>Civil</td>
            <td>C.P.L.A. 12345/2024</td>
            <td>Ahmed  v.  State</td>
            <td>Mr. Justice A</td>
            <td>01-02-2025</td>
            <td><a href="/downloads_judgements/c.p._12345_2024.pdf">View</a></td>
          </tr>
          <tr>
            <td>2</td>
            <td>Criminal</td>
            <td>Crl.A. 67890/2023</td>
            <td><a href="https://www.supremecourt.gov.pk/downloads_judgements/crl.a._67890.PDF">Khan v. Federation</a></td>
          </tr>
          <tr><td>3</td><td><a href="/short.pdf">short</a></td></tr>
        </table>
        <a href="/notice.pdf">Notice</a>
    "#;

    fn base() -> Url {
        Url::parse("https://www.supremecourt.gov.pk/latest-judgements/").unwrap()
    }

    #[test]
    fn test_parse_sc_page() {
        let report = ScParser.parse(PAGE, &base());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, 2);

        assert_eq!(
            report.records[0],
            Record::Table(TableRecord {
                serial: "1".to_string(),
                subject: "Civil".to_string(),
                case_no: "C.P.L.A. 12345/2024".to_string(),
                title: "Ahmed  v.  State".to_string(),
                judge: "Mr. Justice A".to_string(),
                uploaded: "01-02-2025".to_string(),
                link: "https://www.supremecourt.gov.pk/downloads_judgements/c.p._12345_2024.pdf"
                    .to_string(),
            })
        );
    }

    #[test]
    fn test_short_row_defaults() {
        let report = ScParser.parse(PAGE, &base());
        match &report.records[1] {
            Record::Table(r) => {
                assert_eq!(r.case_no, "Crl.A. 67890/2023");
                assert_eq!(r.title, "Khan v. Federation");
                assert_eq!(r.judge, "");
                assert_eq!(r.uploaded, UPLOADED_MISSING);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_case_no_spacing_is_kept() {
        let page = r#"<table><tr>
            <td>4</td><td>Civil</td><td> C.P.L.A.  12345/2024 </td><td>Ali v. State</td>
            <td><a href="/a.pdf">View</a></td>
        </tr></table>"#;
        let report = ScParser.parse(page, &base());
        match &report.records[0] {
            Record::Table(r) => assert_eq!(r.case_no, "C.P.L.A.  12345/2024"),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_nested_cells_are_counted() {
        // The inner table's cell is matched after its parent, in document order.
        let page = r#"<table><tr>
            <td>5</td>
            <td><table><tr><td>Criminal</td></tr></table></td>
            <td>Crl.A. 1/2025</td>
            <td><a href="/b.pdf">Doe v. State</a></td>
        </tr></table>"#;
        let items = ScParser.parse_items(page, &base());
        match &items[0] {
            Ok(Record::Table(r)) => {
                assert_eq!(r.serial, "5");
                assert_eq!(r.subject, "Criminal");
                assert_eq!(r.case_no, "Criminal");
                assert_eq!(r.title, "Crl.A. 1/2025");
                assert_eq!(r.judge, "Doe v. State");
                assert_eq!(r.uploaded, UPLOADED_MISSING);
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_item_errors() {
        let items = ScParser.parse_items(PAGE, &base());
        assert_eq!(items.len(), 4);
        assert_eq!(items[2], Err(ParseError::TooFewCells(2)));
        assert_eq!(items[3], Err(ParseError::NoEnclosingElement("tr")));
    }
}
