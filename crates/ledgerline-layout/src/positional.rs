//! Positional page reconstruction: words → rows → header → columns

use crate::columns::ColumnAssigner;
use crate::header::HeaderDetector;
use crate::keywords::KeywordTable;
use crate::rows::RowBuilder;
use ledgerline_domain::Token;
use tracing::debug;

/// Rebuilds one page as pipe-delimited text from its word boxes.
#[derive(Debug, Clone, Copy)]
pub struct PositionalReconstructor<'a> {
    rows: RowBuilder,
    header: HeaderDetector<'a>,
    assigner: ColumnAssigner,
}

impl<'a> PositionalReconstructor<'a> {
    /// Create a reconstructor with a row tolerance and a keyword table
    pub fn new(row_tolerance: f64, keywords: &'a KeywordTable) -> Self {
        Self {
            rows: RowBuilder::new(row_tolerance),
            header: HeaderDetector::new(keywords),
            assigner: ColumnAssigner::new(),
        }
    }

    /// Reconstruct the page text, one line per visual row
    pub fn reconstruct(&self, tokens: Vec<Token>) -> String {
        if tokens.is_empty() {
            return String::new();
        }

        let rows = self.rows.build(tokens);
        let header = self.header.detect(&rows);
        debug!(
            "Positional layout: {} rows, header at {}, {} columns",
            rows.len(),
            header.header_index,
            header.columns.len()
        );

        self.assigner.assign(&rows, &header).join("\n")
    }
}

impl Default for PositionalReconstructor<'static> {
    fn default() -> Self {
        Self::new(5.0, KeywordTable::standard())
    }
}
