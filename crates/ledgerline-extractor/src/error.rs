//! Error types for the Extractor

use ledgerline_layout::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The input file does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Document text recovery failed before any page was processed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// No usable text was recovered from any page
    #[error("Could not extract text from document ({chars} usable characters)")]
    NoContent {
        /// Usable characters recovered across all pages
        chars: usize,
    },

    /// Text was recovered but no transactions were found in it
    #[error("No transactions found")]
    NoTransactions,

    /// Text-to-structured-data provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A completion call exceeded its deadline
    #[error("Extraction timeout")]
    Timeout,

    /// A background task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tokio::task::JoinError> for ExtractorError {
    fn from(e: tokio::task::JoinError) -> Self {
        ExtractorError::Join(e.to_string())
    }
}
