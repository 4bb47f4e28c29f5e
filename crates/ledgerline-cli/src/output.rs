//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use ledgerline_domain::{Direction, StatementSummary, Transaction};
use ledgerline_extractor::{transaction_json, StatementReport};
use ledgerline_layout::DocumentText;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style, Width},
};

/// Description cells are cut to this many characters in tables.
const DESCRIPTION_WIDTH: usize = 40;

const RULE_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a statement report.
    pub fn format_report(&self, report: &StatementReport) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(&report.to_json())?),
            CliFormat::Table => Ok(format!(
                "{}\n{}",
                self.transactions_table(&report.transactions),
                self.summary_block(&report.bank, &report.source, &report.summary)
            )),
        }
    }

    /// Format a bare transaction list.
    pub fn format_transactions(&self, transactions: &[Transaction]) -> Result<String> {
        match self.format {
            CliFormat::Json => {
                let rows: Vec<_> = transactions.iter().map(transaction_json).collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            CliFormat::Table => Ok(self.transactions_table(transactions)),
        }
    }

    /// Format recovered document text with per-page provenance.
    pub fn format_document(&self, document: &DocumentText) -> String {
        let mut out = String::new();
        for (page, strategy) in document.strategies() {
            out.push_str(&self.info(&format!("page {}: {}", page, strategy.as_str())));
            out.push('\n');
        }
        out.push_str(&self.info(&format!("{} content chars", document.content_chars())));
        out.push('\n');
        out.push_str(&document.render());
        out
    }

    /// Format a failure.
    ///
    /// JSON output keeps the report shape so callers can branch on `success`.
    pub fn format_failure(&self, message: &str) -> String {
        match self.format {
            CliFormat::Json => json!({ "success": false, "error": message }).to_string(),
            CliFormat::Table => self.error(message),
        }
    }

    fn transactions_table(&self, transactions: &[Transaction]) -> String {
        if transactions.is_empty() {
            return self.colorize("No transactions found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Date", "Value Date", "Description", "Debit", "Credit", "Balance"]);

        for tx in transactions {
            builder.push_record([
                tx.date.clone(),
                tx.value_date.clone(),
                tx.description.clone(),
                format_amount(tx.debit),
                format_amount(tx.credit),
                format_amount(tx.balance),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::single(2)).with(Width::truncate(DESCRIPTION_WIDTH)))
            .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn summary_block(&self, bank: &str, source: &str, summary: &StatementSummary) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let direction = match summary.direction {
            Direction::Surplus => self.colorize(summary.direction.as_str(), "green"),
            Direction::Deficit => self.colorize(summary.direction.as_str(), "red"),
        };

        let lines = [
            rule.clone(),
            format!("  {}", self.colorize("FINANCIAL SUMMARY", "cyan")),
            rule.clone(),
            format!("  Bank           : {}", bank),
            format!("  Source File    : {}", source),
            format!("  Total Rows     : {}", summary.total_rows),
            format!("  Debit Rows     : {}", summary.debit_rows),
            format!("  Credit Rows    : {}", summary.credit_rows),
            format!("  Total Debits   : {}", money(summary.total_debits)),
            format!("  Total Credits  : {}", money(summary.total_credits)),
            format!(
                "  Net Cash Flow  : {} ({})",
                money(summary.net_cash_flow.abs()),
                direction
            ),
            format!("  Closing Balance: {}", money(summary.closing_balance)),
            rule,
        ];
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Format a table amount: currency marker, thousands separators, two
/// decimals, and blank for zero.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        money(value)
    }
}

fn money(value: f64) -> String {
    format!("N {}", with_thousands(value))
}

/// `1234567.891` → `1,234,567.89`
pub fn with_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.001 rounds to 0.00 and stays unsigned
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_extractor::ExtractionMetadata;

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                date: "01/12/2025".to_string(),
                value_date: "01/12/2025".to_string(),
                description: "POS purchase at a very long merchant name that keeps going".to_string(),
                debit: 7037.31,
                credit: 0.0,
                balance: 26397.74,
            },
            Transaction {
                date: "02/12/2025".to_string(),
                value_date: "02/12/2025".to_string(),
                description: "Salary".to_string(),
                debit: 0.0,
                credit: 1_250_000.0,
                balance: 1_276_397.74,
            },
        ]
    }

    fn report() -> StatementReport {
        let transactions = transactions();
        StatementReport {
            bank: "Zenith Bank".to_string(),
            source: "statement.pdf".to_string(),
            summary: StatementSummary::from_transactions(&transactions),
            transactions,
            pages: vec![],
            metadata: ExtractionMetadata {
                model_name: "gpt-4o".to_string(),
                text_chars: 1200,
                chunks: vec![],
                candidates_before_dedup: 2,
                duplicates_removed: 0,
                tokens_used: 900,
                processing_time_ms: 15,
            },
        }
    }

    #[test]
    fn test_with_thousands() {
        assert_eq!(with_thousands(0.0), "0.00");
        assert_eq!(with_thousands(999.5), "999.50");
        assert_eq!(with_thousands(1000.0), "1,000.00");
        assert_eq!(with_thousands(26397.74), "26,397.74");
        assert_eq!(with_thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(with_thousands(-50.0), "-50.00");
        assert_eq!(with_thousands(-0.001), "0.00");
    }

    #[test]
    fn test_zero_amount_is_blank() {
        assert_eq!(format_amount(0.0), "");
        assert_eq!(format_amount(-0.0), "");
        assert_eq!(format_amount(7037.31), "N 7,037.31");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_report(&report()).unwrap();

        assert!(output.contains("Description"));
        assert!(output.contains("N 7,037.31"));
        assert!(output.contains("N 1,250,000.00"));
        assert!(output.contains("FINANCIAL SUMMARY"));
        assert!(output.contains("Zenith Bank"));
        assert!(output.contains("(surplus)"));
        // Long narrations are cut
        assert!(!output.contains("keeps going"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["bank"], "Zenith Bank");
        assert_eq!(value["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(value["summary"]["direction"], "surplus");
    }

    #[test]
    fn test_json_failure() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_failure("No transactions found")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "No transactions found"}));
    }

    #[test]
    fn test_empty_transactions() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_transactions(&[]).unwrap();
        assert!(output.contains("No transactions found"));
    }

    #[test]
    fn test_transactions_json() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.format_transactions(&transactions()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["credit"], 1_250_000.0);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(CliFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.format_failure("boom"), "✗ boom");
    }
}
