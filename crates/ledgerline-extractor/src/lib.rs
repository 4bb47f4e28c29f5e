//! Ledgerline Extractor
//!
//! Turns recovered statement text into an ordered, de-duplicated list of
//! transactions using a text-to-structured-data engine.
//!
//! # Architecture
//!
//! ```text
//! Document → Layout → Chunker → LLM → Salvage → Normalize → Dedup → Report
//! ```
//!
//! # Key Features
//!
//! - **Line-aware chunking**: long statements are split without cutting rows
//! - **Response salvage**: fenced, wrapped, truncated or partial JSON is
//!   recovered through an ordered cascade of parse strategies
//! - **Amount normalization**: currency markers, thousands separators and
//!   parenthesised negatives
//! - **Deduplication**: rows repeated across chunk boundaries are dropped
//! - **Per-chunk isolation**: a failed or timed-out chunk yields no records
//!   and never aborts the run
//!
//! # Example Usage
//!
//! ```no_run
//! use ledgerline_extractor::{Extractor, ExtractorConfig, StatementPipeline};
//! use ledgerline_layout::{system_extractor, LayoutConfig};
//! use ledgerline_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let document = system_extractor(LayoutConfig::default())?;
//! let extractor = Extractor::new(MockProvider::new("[]"), ExtractorConfig::default())?;
//! let pipeline = StatementPipeline::new(document, extractor);
//!
//! let report = pipeline.process("statement.pdf".as_ref()).await?;
//! println!("{}: {} transactions", report.bank, report.transactions.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod bank;
mod chunking;
mod config;
mod dedup;
mod error;
mod extractor;
mod normalize;
mod pipeline;
mod prompt;
mod salvage;
mod types;

#[cfg(test)]
mod tests;

pub use bank::{detect_bank, UNKNOWN_BANK};
pub use chunking::TextChunker;
pub use config::ExtractorConfig;
pub use dedup::{Deduplicator, DESCRIPTION_KEY_CHARS};
pub use error::ExtractorError;
pub use extractor::{salvage_transactions, Extractor};
pub use normalize::{clean_amount, RecordNormalizer};
pub use pipeline::StatementPipeline;
pub use prompt::{PromptBuilder, SYSTEM_PROMPT};
pub use salvage::{ResponseSalvager, SalvageStrategy, Salvaged};
pub use types::{
    summary_json, transaction_json, ChunkOutcome, ExtractionMetadata, ExtractionResult,
    PageProvenance, StatementReport,
};
