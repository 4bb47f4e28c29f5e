//! Candidate → Transaction normalization

use ledgerline_domain::{Candidate, RawField, Transaction};

/// Spellings that mean "no amount"
const BLANK_AMOUNTS: [&str; 5] = ["", "-", "nil", "n/a", "nan"];

/// Currency markers removed before parsing an amount
const CURRENCY_MARKERS: [&str; 2] = ["NGN", "₦"];

/// Parse a printed amount.
///
/// Thousands separators, `#`, whitespace and currency markers are removed;
/// an amount wrapped in parentheses is negative. Anything unparseable, and
/// any non-finite result, is `0.0`.
///
/// # Examples
///
/// ```
/// use ledgerline_extractor::clean_amount;
///
/// assert_eq!(clean_amount("7,037.31"), 7037.31);
/// assert_eq!(clean_amount("(500.00)"), -500.0);
/// assert_eq!(clean_amount("₦330,000.00"), 330000.0);
/// assert_eq!(clean_amount("N/A"), 0.0);
/// ```
pub fn clean_amount(text: &str) -> f64 {
    let trimmed = text.trim();
    if BLANK_AMOUNTS.iter().any(|b| trimmed.eq_ignore_ascii_case(b)) {
        return 0.0;
    }

    let mut stripped = trimmed.to_string();
    for marker in CURRENCY_MARKERS {
        stripped = stripped.replace(marker, "");
    }
    let compact: String = stripped
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == ',' || *c == '#'))
        .collect();

    let negative = compact.starts_with('(') && compact.ends_with(')');
    let digits = compact.trim_matches(|c| c == '(' || c == ')');

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if negative {
                -value
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Turns loosely-typed candidates into fully-populated transactions
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Create a new normalizer
    pub fn new() -> Self {
        Self
    }

    /// Normalize one candidate. Every field of the result is present.
    pub fn normalize(&self, candidate: &Candidate) -> Transaction {
        Transaction {
            date: text_field(candidate.date.as_ref()),
            value_date: text_field(candidate.value_date.as_ref()),
            description: text_field(candidate.description.as_ref()),
            debit: amount_field(candidate.debit.as_ref()),
            credit: amount_field(candidate.credit.as_ref()),
            balance: amount_field(candidate.balance.as_ref()),
        }
    }

    /// Normalize a batch, preserving order
    pub fn normalize_all(&self, candidates: &[Candidate]) -> Vec<Transaction> {
        candidates.iter().map(|c| self.normalize(c)).collect()
    }
}

fn text_field(field: Option<&RawField>) -> String {
    match field {
        None | Some(RawField::Null) => String::new(),
        Some(RawField::Text(s)) => s.trim().to_string(),
        Some(RawField::Number(n)) => n.clone(),
        Some(RawField::Bool(b)) => b.to_string(),
        Some(RawField::Other(json)) => json.trim().to_string(),
    }
}

fn amount_field(field: Option<&RawField>) -> f64 {
    match field {
        Some(RawField::Text(s)) => clean_amount(s),
        Some(RawField::Number(n)) => n.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_amount_formats() {
        assert_eq!(clean_amount("7,037.31"), 7037.31);
        assert_eq!(clean_amount("(500.00)"), -500.0);
        assert_eq!(clean_amount("₦330,000.00"), 330000.0);
        assert_eq!(clean_amount("NGN 1,200.50"), 1200.5);
        assert_eq!(clean_amount("# 45"), 45.0);
        assert_eq!(clean_amount(" 1 000 "), 1000.0);
    }

    #[test]
    fn test_clean_amount_blanks() {
        for blank in ["", "  ", "-", "nil", "Nil", "NIL", "N/A", "n/a", "nan", "NaN"] {
            assert_eq!(clean_amount(blank), 0.0, "{:?}", blank);
        }
    }

    #[test]
    fn test_clean_amount_garbage_is_zero() {
        assert_eq!(clean_amount("abc"), 0.0);
        assert_eq!(clean_amount("12.3.4"), 0.0);
        assert_eq!(clean_amount("inf"), 0.0);
        assert_eq!(clean_amount("1e999"), 0.0);
    }

    #[test]
    fn test_normalize_missing_fields() {
        let tx = RecordNormalizer::new().normalize(&Candidate::default());
        assert_eq!(tx, Transaction::default());
    }

    #[test]
    fn test_normalize_mixed_types() {
        let candidate = Candidate {
            date: Some(RawField::Text("  01/12/2025 ".into())),
            value_date: Some(RawField::Null),
            description: Some(RawField::Number("42".into())),
            debit: Some(RawField::Number("7037.31".into())),
            credit: Some(RawField::Text("N/A".into())),
            balance: Some(RawField::Bool(true)),
        };
        let tx = RecordNormalizer::new().normalize(&candidate);

        assert_eq!(tx.date, "01/12/2025");
        assert_eq!(tx.value_date, "");
        assert_eq!(tx.description, "42");
        assert_eq!(tx.debit, 7037.31);
        assert_eq!(tx.credit, 0.0);
        assert_eq!(tx.balance, 0.0);
    }

    #[test]
    fn test_number_text_is_kept_verbatim() {
        let candidate = Candidate {
            date: Some(RawField::Number("20251201".into())),
            description: Some(RawField::Number("12345678901234567890".into())),
            debit: Some(RawField::Number("1e999".into())),
            credit: Some(RawField::Number("2.5e3".into())),
            ..Candidate::default()
        };
        let tx = RecordNormalizer::new().normalize(&candidate);

        assert_eq!(tx.date, "20251201");
        assert_eq!(tx.description, "12345678901234567890");
        assert_eq!(tx.debit, 0.0);
        assert_eq!(tx.credit, 2500.0);
    }

    #[test]
    fn test_normalize_all_keeps_order() {
        let mut first = Candidate::default();
        first.set("date", RawField::Text("a".into()));
        let mut second = Candidate::default();
        second.set("date", RawField::Text("b".into()));

        let txs = RecordNormalizer::new().normalize_all(&[first, second]);
        assert_eq!(txs[0].date, "a");
        assert_eq!(txs[1].date, "b");
    }
}
