//! Assigning row tokens to columns and rendering pipe-delimited lines

use crate::header::HeaderMatch;
use ledgerline_domain::{Column, ColumnMap, Row};

/// Separator between the five fields of a reconstructed line
pub const FIELD_SEPARATOR: &str = " | ";

/// Renders rows at or below the header as column-aligned text lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnAssigner;

impl ColumnAssigner {
    /// Create a column assigner
    pub fn new() -> Self {
        Self
    }

    /// Render every row from the header index down, one line per row.
    ///
    /// Lines made only of whitespace and `|` are dropped.
    pub fn assign(&self, rows: &[Row], header: &HeaderMatch) -> Vec<String> {
        rows.iter()
            .skip(header.header_index)
            .map(|row| self.render_row(row, &header.columns))
            .filter(|line| !line.trim_matches(|c: char| c.is_whitespace() || c == '|').is_empty())
            .collect()
    }

    /// Render one row.
    ///
    /// With a column map every token goes to its nearest column and the five
    /// columns are joined with [`FIELD_SEPARATOR`]; without one the tokens are
    /// joined with spaces.
    pub fn render_row(&self, row: &Row, columns: &ColumnMap) -> String {
        if columns.is_empty() {
            return row.text();
        }

        let mut cells: [Vec<&str>; 5] = Default::default();
        for token in row.tokens() {
            let column = columns.nearest(token.center_x()).unwrap_or(Column::Description);
            cells[column as usize].push(token.text.as_str());
        }

        cells
            .iter()
            .map(|words| words.join(" "))
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_domain::Token;

    fn columns() -> ColumnMap {
        let mut map = ColumnMap::new();
        map.set(Column::Date, 40.0);
        map.set(Column::Description, 150.0);
        map.set(Column::Debit, 300.0);
        map.set(Column::Credit, 380.0);
        map.set(Column::Balance, 460.0);
        map
    }

    fn token(text: &str, cx: f64) -> Token {
        Token::new(text, cx - 5.0, 200.0, cx + 5.0, 208.0)
    }

    #[test]
    fn test_tokens_go_to_nearest_column() {
        let row = Row::new(vec![
            token("01/12/2025", 42.0),
            token("POS", 120.0),
            token("Purchase", 170.0),
            token("7,037.31", 305.0),
            token("26,397.74", 455.0),
        ]);
        let line = ColumnAssigner::new().render_row(&row, &columns());
        assert_eq!(line, "01/12/2025 | POS Purchase | 7,037.31 |  | 26,397.74");
    }

    #[test]
    fn test_unstructured_passthrough() {
        let row = Row::new(vec![token("Opening", 10.0), token("balance", 60.0)]);
        let line = ColumnAssigner::new().render_row(&row, &ColumnMap::new());
        assert_eq!(line, "Opening balance");
    }

    #[test]
    fn test_equidistant_token_is_stable() {
        let row = Row::new(vec![token("100.00", 340.0)]);
        let assigner = ColumnAssigner::new();
        let first = assigner.render_row(&row, &columns());
        for _ in 0..5 {
            assert_eq!(assigner.render_row(&row, &columns()), first);
        }
        assert_eq!(first, " |  | 100.00 |  | ");
    }

    #[test]
    fn test_assign_starts_at_header_and_drops_empty_lines() {
        let rows = vec![
            Row::new(vec![token("Bank", 10.0)]),
            Row::new(vec![token("Date", 40.0), token("Debit", 300.0)]),
            Row::new(vec![token("|", 150.0)]),
            Row::new(vec![token("02/12/2025", 40.0), token("50.00", 300.0)]),
        ];
        let header = HeaderMatch {
            columns: columns(),
            header_index: 1,
        };
        let lines = ColumnAssigner::new().assign(&rows, &header);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Date |  | Debit |  | ");
        assert_eq!(lines[1], "02/12/2025 |  | 50.00 |  | ");
    }
}
