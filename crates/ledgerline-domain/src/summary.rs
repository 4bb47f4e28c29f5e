//! Cash-flow aggregates over a statement

use crate::Transaction;
use std::fmt;

/// Whether money in exceeded money out over the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Net cash flow is zero or positive
    Surplus,
    /// Net cash flow is negative
    Deficit,
}

impl Direction {
    /// Get the direction name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Surplus => "surplus",
            Direction::Deficit => "deficit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary figures over an ordered transaction list
#[derive(Debug, Clone, PartialEq)]
pub struct StatementSummary {
    /// Number of transactions
    pub total_rows: usize,
    /// Transactions with a positive debit
    pub debit_rows: usize,
    /// Transactions with a positive credit
    pub credit_rows: usize,
    /// Sum of all debits
    pub total_debits: f64,
    /// Sum of all credits
    pub total_credits: f64,
    /// `total_credits - total_debits`
    pub net_cash_flow: f64,
    /// Balance of the last transaction in document order (0.0 when empty)
    pub closing_balance: f64,
    /// `Surplus` iff `net_cash_flow >= 0`
    pub direction: Direction,
}

impl StatementSummary {
    /// Compute the summary for transactions in document order
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgerline_domain::{Direction, StatementSummary, Transaction};
    ///
    /// let txs = vec![
    ///     Transaction { debit: 200.0, balance: 800.0, ..Default::default() },
    ///     Transaction { credit: 500.0, balance: 1300.0, ..Default::default() },
    /// ];
    /// let summary = StatementSummary::from_transactions(&txs);
    /// assert_eq!(summary.net_cash_flow, 300.0);
    /// assert_eq!(summary.closing_balance, 1300.0);
    /// assert_eq!(summary.direction, Direction::Surplus);
    /// ```
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_debits: f64 = transactions.iter().map(|t| t.debit).sum();
        let total_credits: f64 = transactions.iter().map(|t| t.credit).sum();
        let net_cash_flow = total_credits - total_debits;

        Self {
            total_rows: transactions.len(),
            debit_rows: transactions.iter().filter(|t| t.debit > 0.0).count(),
            credit_rows: transactions.iter().filter(|t| t.credit > 0.0).count(),
            total_debits,
            total_credits,
            net_cash_flow,
            closing_balance: transactions.last().map(|t| t.balance).unwrap_or(0.0),
            direction: if net_cash_flow >= 0.0 {
                Direction::Surplus
            } else {
                Direction::Deficit
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(debit: f64, credit: f64, balance: f64) -> Transaction {
        Transaction {
            date: "01/12/2025".to_string(),
            debit,
            credit,
            balance,
            ..Default::default()
        }
    }

    #[test]
    fn test_opening_debit_credit_sequence() {
        let txs = vec![tx(0.0, 0.0, 1000.0), tx(200.0, 0.0, 800.0), tx(0.0, 500.0, 1300.0)];
        let summary = StatementSummary::from_transactions(&txs);

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.debit_rows, 1);
        assert_eq!(summary.credit_rows, 1);
        assert_eq!(summary.total_debits, 200.0);
        assert_eq!(summary.total_credits, 500.0);
        assert_eq!(summary.net_cash_flow, 300.0);
        assert_eq!(summary.closing_balance, 1300.0);
        assert_eq!(summary.direction, Direction::Surplus);
    }

    #[test]
    fn test_deficit() {
        let summary = StatementSummary::from_transactions(&[tx(50.0, 10.0, 960.0)]);
        assert_eq!(summary.net_cash_flow, -40.0);
        assert_eq!(summary.direction, Direction::Deficit);
        assert_eq!(summary.direction.to_string(), "deficit");
    }

    #[test]
    fn test_empty_is_zero_surplus() {
        let summary = StatementSummary::from_transactions(&[]);
        assert_eq!(summary.total_rows, 0);
        assert_eq!(summary.closing_balance, 0.0);
        assert_eq!(summary.direction, Direction::Surplus);
    }
}
