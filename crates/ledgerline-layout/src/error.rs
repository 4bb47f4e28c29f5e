//! Error types for layout extraction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while recovering text from a document
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The file extension is not a paged document or raster image
    #[error("Unsupported file type: {0}")]
    UnsupportedDocument(String),

    /// The document could not be opened or has no pages
    #[error("Cannot open document {path}: {reason}")]
    Unreadable {
        /// Offending document
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// An external tool could not be started or exited unsuccessfully
    #[error("{tool} failed: {message}")]
    Tool {
        /// Executable name
        tool: &'static str,
        /// Captured stderr or spawn error
        message: String,
    },

    /// Output from an external tool was not in the expected shape
    #[error("Unexpected {tool} output: {message}")]
    Output {
        /// Executable name
        tool: &'static str,
        /// Description of the mismatch
        message: String,
    },

    /// I/O error on scratch files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
