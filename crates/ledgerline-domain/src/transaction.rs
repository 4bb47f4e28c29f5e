//! Candidate records and normalized transactions

/// A raw field value as it arrived from the structured-data collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    /// A JSON string
    Text(String),
    /// A JSON number, kept as the text it was written with
    Number(String),
    /// A JSON boolean
    Bool(bool),
    /// A JSON `null`
    Null,
    /// Any nested value (array or object), kept as its JSON text
    Other(String),
}

/// A partially-populated record salvaged from a model response.
///
/// Every field is optional and may hold a value of the wrong type. The
/// normalizer is the only place a candidate becomes a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    /// Transaction date
    pub date: Option<RawField>,
    /// Value date
    pub value_date: Option<RawField>,
    /// Narration
    pub description: Option<RawField>,
    /// Money out
    pub debit: Option<RawField>,
    /// Money in
    pub credit: Option<RawField>,
    /// Running balance
    pub balance: Option<RawField>,
}

impl Candidate {
    /// Field names a candidate understands
    pub const FIELDS: [&'static str; 6] =
        ["date", "value_date", "description", "debit", "credit", "balance"];

    /// Set a field by its wire name.
    ///
    /// Returns `false` (and stores nothing) for names outside [`Candidate::FIELDS`].
    pub fn set(&mut self, name: &str, value: RawField) -> bool {
        let slot = match name {
            "date" => &mut self.date,
            "value_date" => &mut self.value_date,
            "description" => &mut self.description,
            "debit" => &mut self.debit,
            "credit" => &mut self.credit,
            "balance" => &mut self.balance,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Whether no known field is present
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.value_date.is_none()
            && self.description.is_none()
            && self.debit.is_none()
            && self.credit.is_none()
            && self.balance.is_none()
    }
}

/// A normalized ledger entry. All six fields are always present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transaction {
    /// Transaction date as printed on the statement
    pub date: String,
    /// Value date as printed on the statement
    pub value_date: String,
    /// Narration
    pub description: String,
    /// Money out (negative only when the source used parenthesis notation)
    pub debit: f64,
    /// Money in
    pub credit: f64,
    /// Running balance after this entry
    pub balance: f64,
}
