//! Result and report types

use crate::salvage::SalvageStrategy;
use ledgerline_domain::{StatementSummary, Transaction};
use ledgerline_layout::PageStrategy;
use serde_json::{json, Value};

/// What happened to one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    /// 1-based chunk number
    pub index: usize,
    /// Characters in the chunk
    pub chars: usize,
    /// Records salvaged from the response
    pub records: usize,
    /// Salvage strategy that succeeded, if any
    pub strategy: Option<SalvageStrategy>,
    /// Provider error or timeout, when the chunk failed
    pub error: Option<String>,
}

impl ChunkOutcome {
    /// Whether the completion call itself failed
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMetadata {
    /// Name of the model used
    pub model_name: String,

    /// Characters of document text sent for parsing
    pub text_chars: usize,

    /// Per-chunk outcomes, in order
    pub chunks: Vec<ChunkOutcome>,

    /// Records before duplicate removal
    pub candidates_before_dedup: usize,

    /// Records removed as duplicates
    pub duplicates_removed: usize,

    /// Tokens reported by the provider during this run
    pub tokens_used: u64,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ExtractionMetadata {
    /// Number of chunks whose completion call failed
    pub fn chunk_failures(&self) -> usize {
        self.chunks.iter().filter(|c| c.failed()).count()
    }
}

/// Result of parsing document text into transactions
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// De-duplicated transactions in document order
    pub transactions: Vec<Transaction>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Committed strategy for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProvenance {
    /// 1-based page number
    pub page: usize,
    /// Strategy the page committed to
    pub strategy: PageStrategy,
}

/// Final output for one statement
#[derive(Debug, Clone, PartialEq)]
pub struct StatementReport {
    /// Detected issuing bank, or "Unknown"
    pub bank: String,

    /// File name of the source document
    pub source: String,

    /// Cash-flow aggregates
    pub summary: StatementSummary,

    /// De-duplicated transactions in document order
    pub transactions: Vec<Transaction>,

    /// Per-page extraction provenance
    pub pages: Vec<PageProvenance>,

    /// Parsing metadata
    pub metadata: ExtractionMetadata,
}

impl StatementReport {
    /// JSON form of the report, with a `success` flag for front ends
    pub fn to_json(&self) -> Value {
        json!({
            "success": true,
            "bank": self.bank,
            "filename": self.source,
            "summary": summary_json(&self.summary),
            "transactions": self.transactions.iter().map(transaction_json).collect::<Vec<_>>(),
            "metadata": {
                "model": self.metadata.model_name,
                "text_chars": self.metadata.text_chars,
                "chunks": self.metadata.chunks.len(),
                "chunk_failures": self.metadata.chunk_failures(),
                "candidates_before_dedup": self.metadata.candidates_before_dedup,
                "duplicates_removed": self.metadata.duplicates_removed,
                "tokens_used": self.metadata.tokens_used,
                "processing_time_ms": self.metadata.processing_time_ms,
                "pages": self.pages.iter().map(|p| json!({
                    "page": p.page,
                    "strategy": p.strategy.as_str(),
                })).collect::<Vec<_>>(),
            },
        })
    }
}

/// JSON form of one transaction
pub fn transaction_json(tx: &Transaction) -> Value {
    json!({
        "date": tx.date,
        "value_date": tx.value_date,
        "description": tx.description,
        "debit": tx.debit,
        "credit": tx.credit,
        "balance": tx.balance,
    })
}

/// JSON form of a summary
pub fn summary_json(summary: &StatementSummary) -> Value {
    json!({
        "total_rows": summary.total_rows,
        "debit_rows": summary.debit_rows,
        "credit_rows": summary.credit_rows,
        "total_debits": summary.total_debits,
        "total_credits": summary.total_credits,
        "net_cash_flow": summary.net_cash_flow,
        "closing_balance": summary.closing_balance,
        "direction": summary.direction.as_str(),
    })
}
