//! Data models for judgments scraped from the court listing pages.
//!
//! Each source produces exactly one shape of record:
//! - [`ListRecord`]: a free-text entry from a link list (Lahore High Court)
//! - [`TableRecord`]: a row from a judgments table (Supreme Court)
//!
//! [`Record`] wraps both so the ledger and engine can handle them uniformly.

use std::fmt;

/// Value used for the `uploaded` column when the source row has no such cell.
pub const UPLOADED_MISSING: &str = "N/A";

/// Number of description characters used to recognise a [`ListRecord`].
pub const DESCRIPTION_FINGERPRINT_CHARS: usize = 50;

/// A judgment listed as a single description with a link.
///
/// The description usually embeds the case number, parties, judge and date
/// in one string, so there is no structured field to key on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRecord {
    /// Collapsed text of the cell that holds the link.
    pub description: String,
    /// Absolute URL of the judgment document.
    pub link: String,
}

/// A judgment listed as a row in a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub serial: String,
    pub subject: String,
    pub case_no: String,
    pub title: String,
    pub judge: String,
    /// Upload date as shown by the court, or [`UPLOADED_MISSING`].
    pub uploaded: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    List(ListRecord),
    Table(TableRecord),
}

impl Record {
    /// Cell values in ledger column order. The link cell is already
    /// formatted as a markdown link.
    pub fn cells(&self) -> Vec<String> {
        match self {
            Record::List(r) => vec![r.description.clone(), link_cell(&r.link)],
            Record::Table(r) => vec![
                r.serial.clone(),
                r.subject.clone(),
                r.case_no.clone(),
                r.title.clone(),
                r.judge.clone(),
                r.uploaded.clone(),
                link_cell(&r.link),
            ],
        }
    }

    /// The raw text that identifies this record inside a ledger, if any.
    ///
    /// Table rows are keyed on the case number. List entries are keyed on
    /// the first [`DESCRIPTION_FINGERPRINT_CHARS`] characters of the
    /// description. An empty key means the record cannot be recognised.
    pub fn fingerprint(&self) -> Option<String> {
        let key = match self {
            Record::List(r) => r
                .description
                .chars()
                .take(DESCRIPTION_FINGERPRINT_CHARS)
                .collect::<String>(),
            Record::Table(r) => r.case_no.clone(),
        };
        if key.is_empty() { None } else { Some(key) }
    }

    pub fn link(&self) -> &str {
        match self {
            Record::List(r) => &r.link,
            Record::Table(r) => &r.link,
        }
    }
}

impl From<ListRecord> for Record {
    fn from(r: ListRecord) -> Self {
        Record::List(r)
    }
}

impl From<TableRecord> for Record {
    fn from(r: TableRecord) -> Self {
        Record::Table(r)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::List(r) => write!(f, "{}", r.description),
            Record::Table(r) => write!(f, "{} {}", r.case_no, r.title),
        }
    }
}

fn link_cell(link: &str) -> String {
    if link.is_empty() {
        String::new()
    } else {
        format!("[Link]({})", link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(case_no: &str) -> TableRecord {
        TableRecord {
            serial: "1".to_string(),
            subject: "Civil".to_string(),
            case_no: case_no.to_string(),
            title: "A v. B".to_string(),
            judge: "J. Khan".to_string(),
            uploaded: UPLOADED_MISSING.to_string(),
            link: "https://example.com/a.pdf".to_string(),
        }
    }

    #[test]
    fn test_table_cells_order() {
        let cells = Record::from(table("C.P.1/2024")).cells();
        assert_eq!(
            cells,
            vec![
                "1",
                "Civil",
                "C.P.1/2024",
                "A v. B",
                "J. Khan",
                "N/A",
                "[Link](https://example.com/a.pdf)"
            ]
        );
    }

    #[test]
    fn test_list_cells_empty_link() {
        let record = Record::List(ListRecord {
            description: "W.P. 1 of 2024".to_string(),
            link: String::new(),
        });
        assert_eq!(record.cells(), vec!["W.P. 1 of 2024".to_string(), String::new()]);
    }

    #[test]
    fn test_table_fingerprint_is_case_no() {
        assert_eq!(
            Record::from(table("12345")).fingerprint().as_deref(),
            Some("12345")
        );
        assert_eq!(Record::from(table("")).fingerprint(), None);
    }

    #[test]
    fn test_list_fingerprint_counts_chars_not_bytes() {
        let description = "é".repeat(60);
        let record = Record::List(ListRecord {
            description,
            link: "https://example.com".to_string(),
        });
        let fp = record.fingerprint().unwrap();
        assert_eq!(fp.chars().count(), DESCRIPTION_FINGERPRINT_CHARS);
    }

    #[test]
    fn test_short_description_fingerprint_is_whole_text() {
        let record = Record::List(ListRecord {
            description: "short".to_string(),
            link: String::new(),
        });
        assert_eq!(record.fingerprint().as_deref(), Some("short"));
    }
}
