//! Duplicate removal across chunk boundaries

use ledgerline_domain::Transaction;
use std::collections::HashSet;

/// Characters of the description that take part in the identity key
pub const DESCRIPTION_KEY_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    date: String,
    description: String,
    debit: u64,
    credit: u64,
}

impl DedupKey {
    fn of(tx: &Transaction) -> Self {
        Self {
            date: tx.date.clone(),
            description: tx.description.chars().take(DESCRIPTION_KEY_CHARS).collect(),
            debit: amount_bits(tx.debit),
            credit: amount_bits(tx.credit),
        }
    }
}

/// Bit pattern of an amount with `-0.0` folded into `0.0`
fn amount_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Drops repeated transactions, keeping the first occurrence
///
/// Two transactions are the same when date, the first 40 characters of the
/// description, debit and credit all match. Balance and value date are not
/// compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Create a new deduplicator
    pub fn new() -> Self {
        Self
    }

    /// Remove duplicates in first-seen order
    pub fn dedup(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        let mut seen = HashSet::with_capacity(transactions.len());
        transactions
            .into_iter()
            .filter(|tx| seen.insert(DedupKey::of(tx)))
            .collect()
    }
}
