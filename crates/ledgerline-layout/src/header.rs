//! Locating the table header and deriving the column map

use crate::keywords::KeywordTable;
use ledgerline_domain::{ColumnMap, Row};

/// Result of scanning a page for its header row
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMatch {
    /// Column centers taken from the header tokens (empty when no header)
    pub columns: ColumnMap,
    /// Index of the header row, or 0 when no header was found
    pub header_index: usize,
}

/// Finds the first header row on a page and maps its tokens to columns.
#[derive(Debug, Clone, Copy)]
pub struct HeaderDetector<'a> {
    keywords: &'a KeywordTable,
}

impl<'a> HeaderDetector<'a> {
    /// Create a detector over a keyword table
    pub fn new(keywords: &'a KeywordTable) -> Self {
        Self { keywords }
    }

    /// Scan rows top to bottom and stop at the first header candidate.
    ///
    /// Each header token is classified into at most one column (checked in
    /// `date, description, debit, credit, balance` order) and the column's
    /// center is set to the token's horizontal midpoint; a later token of the
    /// same column overrides an earlier one.
    pub fn detect(&self, rows: &[Row]) -> HeaderMatch {
        for (index, row) in rows.iter().enumerate() {
            if !self.keywords.is_header(&row.text()) {
                continue;
            }

            let mut columns = ColumnMap::new();
            for token in row.tokens() {
                if let Some(column) = self.keywords.classify(&token.text) {
                    columns.set(column, token.center_x());
                }
            }
            return HeaderMatch {
                columns,
                header_index: index,
            };
        }

        HeaderMatch {
            columns: ColumnMap::new(),
            header_index: 0,
        }
    }
}

impl Default for HeaderDetector<'static> {
    fn default() -> Self {
        Self::new(KeywordTable::standard())
    }
}
