//! Recover candidate records from a free-form model response
//!
//! Responses arrive wrapped in prose, fenced as markdown, cut off mid-array
//! or otherwise damaged. The salvager runs an ordered cascade of parse
//! strategies and stops at the first one that produces a record list.

use ledgerline_domain::{Candidate, RawField};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```(?:json)?").expect("fence regex"))
}

fn array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array regex"))
}

fn object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^{}]+\}").expect("object regex"))
}

/// A parse strategy in the salvage cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalvageStrategy {
    /// The response is a JSON array, or an object with a `transactions` array
    Direct,
    /// Same as `Direct` after removing markdown code fences
    FenceStripped,
    /// The outermost `[...]` span parses as an array
    BracketSearch,
    /// An array cut off mid-record, closed after the last complete record
    TruncationRepair,
    /// Every flat `{...}` span parsed on its own
    ObjectScan,
}

impl SalvageStrategy {
    /// Strategies in the order they are tried
    pub const CASCADE: [SalvageStrategy; 5] = [
        SalvageStrategy::Direct,
        SalvageStrategy::FenceStripped,
        SalvageStrategy::BracketSearch,
        SalvageStrategy::TruncationRepair,
        SalvageStrategy::ObjectScan,
    ];

    /// Get the strategy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SalvageStrategy::Direct => "direct",
            SalvageStrategy::FenceStripped => "fence_stripped",
            SalvageStrategy::BracketSearch => "bracket_search",
            SalvageStrategy::TruncationRepair => "truncation_repair",
            SalvageStrategy::ObjectScan => "object_scan",
        }
    }

    fn attempt(&self, raw: &str, cleaned: &str) -> Option<Vec<Value>> {
        match self {
            SalvageStrategy::Direct => parse_record_list(raw),
            SalvageStrategy::FenceStripped => parse_record_list(cleaned),
            SalvageStrategy::BracketSearch => {
                let span = array_re().find(cleaned)?;
                parse_array(span.as_str())
            }
            SalvageStrategy::TruncationRepair => parse_array(&repair_truncated(cleaned)?),
            SalvageStrategy::ObjectScan => {
                let objects: Vec<Value> = object_re()
                    .find_iter(cleaned)
                    .filter_map(|m| serde_json::from_str(m.as_str()).ok())
                    .collect();
                (!objects.is_empty()).then_some(objects)
            }
        }
    }
}

impl fmt::Display for SalvageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of salvaging one response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Salvaged {
    /// Strategy that succeeded, `None` when nothing could be recovered
    pub strategy: Option<SalvageStrategy>,
    /// Recovered records, in response order
    pub candidates: Vec<Candidate>,
}

/// Runs the salvage cascade over model responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSalvager;

impl ResponseSalvager {
    /// Create a new salvager
    pub fn new() -> Self {
        Self
    }

    /// Recover candidate records from `response`. Never fails; a response
    /// nothing can be made of yields an empty list.
    pub fn salvage(&self, response: &str) -> Salvaged {
        let raw = response.trim();
        let cleaned = fence_re().replace_all(raw, "");
        let cleaned = cleaned.trim();

        for strategy in SalvageStrategy::CASCADE {
            if let Some(values) = strategy.attempt(raw, cleaned) {
                debug!("Salvaged {} value(s) via {}", values.len(), strategy);
                return Salvaged {
                    strategy: Some(strategy),
                    candidates: values.iter().filter_map(to_candidate).collect(),
                };
            }
        }

        debug!("Nothing salvageable in {} char response", raw.len());
        Salvaged::default()
    }
}

fn parse_record_list(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("transactions") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Close an array that was cut off mid-record.
///
/// Keeps everything up to the last `},` boundary, or up to (not including)
/// the last `{` when there is none, and appends `]`.
fn repair_truncated(text: &str) -> Option<String> {
    if !text.starts_with('[') || text.ends_with(']') {
        return None;
    }
    let repaired = match text.rfind("},") {
        Some(last) => format!("{}\n]", &text[..=last]),
        None => format!("{}\n]", &text[..text.rfind('{')?]),
    };
    Some(repaired)
}

/// Convert one JSON value to a candidate; non-objects are dropped
fn to_candidate(value: &Value) -> Option<Candidate> {
    let object = value.as_object()?;
    let mut candidate = Candidate::default();
    for (name, field) in object {
        candidate.set(name, raw_field(field));
    }
    Some(candidate)
}

fn raw_field(value: &Value) -> RawField {
    match value {
        Value::String(s) => RawField::Text(s.clone()),
        Value::Number(n) => RawField::Number(n.to_string()),
        Value::Bool(b) => RawField::Bool(*b),
        Value::Null => RawField::Null,
        other => RawField::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO: &str = r#"[{"date": "01/12/2025", "description": "POS", "debit": "7037.31"}, {"date": "02/12/2025", "credit": 500}]"#;

    fn text(field: &Option<RawField>) -> &str {
        match field {
            Some(RawField::Text(s)) => s,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_direct_array() {
        let result = ResponseSalvager::new().salvage(TWO);
        assert_eq!(result.strategy, Some(SalvageStrategy::Direct));
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(text(&result.candidates[0].debit), "7037.31");
        assert_eq!(result.candidates[1].credit, Some(RawField::Number("500".into())));
    }

    #[test]
    fn test_direct_transactions_object() {
        let response = r#"{"transactions": [{"date": "01/12/2025"}], "currency": "NGN"}"#;
        let result = ResponseSalvager::new().salvage(response);
        assert_eq!(result.strategy, Some(SalvageStrategy::Direct));
        assert_eq!(result.candidates.len(), 1);
    }

    #[test]
    fn test_empty_array_is_a_success() {
        let result = ResponseSalvager::new().salvage("[]");
        assert_eq!(result.strategy, Some(SalvageStrategy::Direct));
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_fenced_array() {
        let response = format!("```json\n{}\n```", TWO);
        let result = ResponseSalvager::new().salvage(&response);
        assert_eq!(result.strategy, Some(SalvageStrategy::FenceStripped));
        assert_eq!(result, Salvaged {
            strategy: Some(SalvageStrategy::FenceStripped),
            candidates: ResponseSalvager::new().salvage(TWO).candidates,
        });
    }

    #[test]
    fn test_uppercase_fence() {
        let result = ResponseSalvager::new().salvage("```JSON\n[{\"date\": \"x\"}]\n```");
        assert_eq!(result.strategy, Some(SalvageStrategy::FenceStripped));
    }

    #[test]
    fn test_array_inside_prose() {
        let response = format!("Here are the transactions:\n{}\nLet me know if you need more.", TWO);
        let result = ResponseSalvager::new().salvage(&response);
        assert_eq!(result.strategy, Some(SalvageStrategy::BracketSearch));
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn test_truncated_array() {
        let response = r#"[{"date": "01/12/2025", "debit": "10"}, {"date": "02/12/2025", "debit": "20"}, {"date": "03/12/20"#;
        let result = ResponseSalvager::new().salvage(response);
        assert_eq!(result.strategy, Some(SalvageStrategy::TruncationRepair));
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(text(&result.candidates[1].date), "02/12/2025");
    }

    #[test]
    fn test_truncated_inside_first_record() {
        // No `},` boundary: cut before the last `{`, leaving an empty array
        let result = ResponseSalvager::new().salvage(r#"[{"date": "01/12"#);
        assert_eq!(result.strategy, Some(SalvageStrategy::TruncationRepair));
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_object_scan() {
        let response = r#"Row 1: {"date": "01/12/2025", "debit": "5"} and row 2: {"date": "02/12/2025"} and {broken"#;
        let result = ResponseSalvager::new().salvage(response);
        assert_eq!(result.strategy, Some(SalvageStrategy::ObjectScan));
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn test_garbage_yields_nothing() {
        let result = ResponseSalvager::new().salvage("I could not find any transactions, sorry.");
        assert_eq!(result, Salvaged::default());
    }

    #[test]
    fn test_non_objects_are_dropped() {
        let result = ResponseSalvager::new().salvage(r#"[1, "two", {"date": "x"}, null]"#);
        assert_eq!(result.candidates.len(), 1);
    }

    #[test]
    fn test_field_kinds() {
        let result = ResponseSalvager::new()
            .salvage(r#"[{"date": null, "description": true, "debit": [1], "balance": 3, "extra": 1}]"#);
        let c = &result.candidates[0];
        assert_eq!(c.date, Some(RawField::Null));
        assert_eq!(c.description, Some(RawField::Bool(true)));
        assert_eq!(c.debit, Some(RawField::Other("[1]".to_string())));
        assert_eq!(c.balance, Some(RawField::Number("3".into())));
        assert_eq!(c.credit, None);
    }

    #[test]
    fn test_large_numbers_keep_their_digits() {
        let result = ResponseSalvager::new()
            .salvage(r#"[{"description": 12345678901234567890, "debit": 42.0, "balance": 0.1}]"#);
        let c = &result.candidates[0];
        assert_eq!(c.description, Some(RawField::Number("12345678901234567890".into())));
        assert_eq!(c.debit, Some(RawField::Number("42.0".into())));
        assert_eq!(c.balance, Some(RawField::Number("0.1".into())));
    }

    #[test]
    fn test_repair_truncated_rules() {
        assert_eq!(repair_truncated("[1, 2]"), None);
        assert_eq!(repair_truncated("{\"a\": 1"), None);
        assert_eq!(repair_truncated("[{\"a\":1},{\"b\""), Some("[{\"a\":1}\n]".to_string()));
        assert_eq!(repair_truncated("[1, 2"), None);
    }
}
