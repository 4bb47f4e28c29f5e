//! Grouping positioned words into visual rows

use ledgerline_domain::{Row, Token};

/// Groups words whose top edges lie within a vertical tolerance into rows.
#[derive(Debug, Clone, Copy)]
pub struct RowBuilder {
    tolerance: f64,
}

impl RowBuilder {
    /// Create a row builder with the given vertical tolerance
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Vertical tolerance in page units
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Build rows top to bottom.
    ///
    /// Words are ordered by `(round(y0 / tolerance), x0)`, then accumulated
    /// into the current row while their `y0` stays within `tolerance` of the
    /// word that opened the row. Each finished row is ordered left to right.
    pub fn build(&self, mut tokens: Vec<Token>) -> Vec<Row> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let band = |t: &Token| (t.y0 / self.tolerance).round_ties_even();
        tokens.sort_by(|a, b| band(a).total_cmp(&band(b)).then(a.x0.total_cmp(&b.x0)));

        let mut rows = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        let mut anchor_y = tokens[0].y0;

        for token in tokens {
            if (token.y0 - anchor_y).abs() > self.tolerance {
                if !current.is_empty() {
                    rows.push(Row::new(std::mem::take(&mut current)));
                }
                anchor_y = token.y0;
            }
            current.push(token);
        }
        if !current.is_empty() {
            rows.push(Row::new(current));
        }

        rows
    }
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self::new(5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, y0: f64) -> Token {
        Token::new(text, x0, y0, x0 + 30.0, y0 + 8.0)
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(RowBuilder::default().build(Vec::new()).is_empty());
    }

    #[test]
    fn test_groups_by_vertical_band() {
        let rows = RowBuilder::default().build(vec![
            word("800.00", 300.0, 121.0),
            word("01/12/2025", 20.0, 100.0),
            word("POS", 100.0, 102.0),
            word("02/12/2025", 20.0, 120.0),
            word("Purchase", 140.0, 101.0),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text(), "01/12/2025 POS Purchase");
        assert_eq!(rows[1].text(), "02/12/2025 800.00");
    }

    #[test]
    fn test_rows_are_left_to_right() {
        let rows = RowBuilder::default().build(vec![
            word("c", 90.0, 50.0),
            word("a", 10.0, 53.0),
            word("b", 50.0, 48.0),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(), "a b c");
    }

    #[test]
    fn test_large_gap_starts_new_row() {
        let rows = RowBuilder::new(2.0).build(vec![word("top", 10.0, 10.0), word("low", 10.0, 13.0)]);
        assert_eq!(rows.len(), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn token_strategy() -> impl Strategy<Value = Token> {
        (0.0f64..600.0, 0.0f64..800.0).prop_map(|(x, y)| Token::new("w", x, y, x + 10.0, y + 8.0))
    }

    proptest! {
        /// Property: every token lands in exactly one row
        #[test]
        fn test_tokens_are_partitioned(tokens in proptest::collection::vec(token_strategy(), 0..60)) {
            let rows = RowBuilder::default().build(tokens.clone());
            let total: usize = rows.iter().map(|r| r.len()).sum();
            prop_assert_eq!(total, tokens.len());
            prop_assert!(rows.iter().all(|r| !r.is_empty()));
        }

        /// Property: rebuilding from the same tokens gives the same rows
        #[test]
        fn test_rebuild_is_idempotent(tokens in proptest::collection::vec(token_strategy(), 0..60)) {
            let builder = RowBuilder::default();
            prop_assert_eq!(builder.build(tokens.clone()), builder.build(tokens));
        }

        /// Property: each row is ordered by left edge
        #[test]
        fn test_rows_sorted_by_x(tokens in proptest::collection::vec(token_strategy(), 0..60)) {
            for row in RowBuilder::default().build(tokens) {
                let xs: Vec<f64> = row.tokens().iter().map(|t| t.x0).collect();
                prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
            }
        }

        /// Property: words whose tops lie within one tolerance band form a single row
        #[test]
        fn test_band_collapses_to_one_row(
            base in 0.0f64..700.0,
            offsets in proptest::collection::vec((0.0f64..4.9, 0.0f64..600.0), 1..20),
        ) {
            let tokens: Vec<Token> = offsets
                .iter()
                .map(|(dy, x)| Token::new("w", *x, base + dy, x + 10.0, base + dy + 8.0))
                .collect();
            let rows = RowBuilder::new(5.0).build(tokens);
            prop_assert_eq!(rows.len(), 1);
        }
    }
}
