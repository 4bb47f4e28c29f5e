//! Header keyword table

use ledgerline_domain::Column;
use regex::Regex;
use std::sync::OnceLock;

/// Case-insensitive whole-word patterns that identify each statement column.
///
/// Built once and shared read-only; detectors take it by reference.
#[derive(Debug)]
pub struct KeywordTable {
    patterns: Vec<(Column, Regex)>,
}

impl KeywordTable {
    /// The standard keyword set for bank statement headers
    pub fn standard() -> &'static KeywordTable {
        static TABLE: OnceLock<KeywordTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let patterns = [
                (Column::Date, r"(?i)\bdate\b"),
                (
                    Column::Description,
                    r"(?i)\b(description|narration|particulars|details|remarks|ref)\b",
                ),
                (Column::Debit, r"(?i)\b(debit|dr\.?|withdrawals?|paid out)\b"),
                (Column::Credit, r"(?i)\b(credit|cr\.?|deposits?|paid in)\b"),
                (Column::Balance, r"(?i)\b(balance|bal\.?|running)\b"),
            ];
            KeywordTable {
                patterns: patterns
                    .into_iter()
                    .map(|(col, p)| (col, Regex::new(p).expect("static keyword pattern")))
                    .collect(),
            }
        })
    }

    /// Whether `text` contains a keyword for `column`
    pub fn matches(&self, column: Column, text: &str) -> bool {
        self.patterns
            .iter()
            .any(|(col, re)| *col == column && re.is_match(text))
    }

    /// First column, in priority order, whose keyword appears in `text`
    pub fn classify(&self, text: &str) -> Option<Column> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(col, _)| *col)
    }

    /// Whether a row's joined text reads like a transaction table header:
    /// a date keyword plus a debit or credit keyword
    pub fn is_header(&self, row_text: &str) -> bool {
        self.matches(Column::Date, row_text)
            && (self.matches(Column::Debit, row_text) || self.matches(Column::Credit, row_text))
    }
}
