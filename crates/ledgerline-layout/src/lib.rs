//! Ledgerline Layout
//!
//! Recovers column-aligned text from bank statement documents.
//!
//! Each page of a PDF goes through a fallback chain:
//! - **Positional**: word boxes are grouped into rows, a header row fixes the
//!   column centers, and every word is assigned to its nearest column
//! - **Table**: stream-mode table detection, cells joined with ` | `
//! - **OCR**: the page is rasterized and recognized as one block of text
//!
//! Raster images skip the chain and go straight to OCR.
//!
//! The [`poppler`] and [`tesseract`] modules drive the poppler-utils and
//! tesseract executables; [`testing`] provides in-memory stand-ins.

#![warn(clippy::all)]

pub mod chain;
pub mod columns;
pub mod config;
pub mod document;
pub mod error;
pub mod header;
pub mod keywords;
pub mod poppler;
pub mod positional;
pub mod rows;
pub mod tesseract;
pub mod testing;
mod tools;

pub use chain::{join_table_rows, ocr_error_marker, FallbackChain, PageStrategy, PageYield};
pub use columns::{ColumnAssigner, FIELD_SEPARATOR};
pub use config::LayoutConfig;
pub use document::{DocumentExtractor, DocumentKind, DocumentSource, DocumentText};
pub use error::LayoutError;
pub use header::{HeaderDetector, HeaderMatch};
pub use keywords::KeywordTable;
pub use poppler::Poppler;
pub use positional::PositionalReconstructor;
pub use rows::RowBuilder;
pub use tesseract::Tesseract;

/// Document extractor backed by poppler-utils and tesseract
pub type SystemDocumentExtractor = DocumentExtractor<Poppler, Poppler, Poppler, Tesseract>;

/// Build a document extractor over the system poppler and tesseract tools
pub fn system_extractor(config: LayoutConfig) -> Result<SystemDocumentExtractor, LayoutError> {
    let poppler = Poppler::new().with_timeout(config.tool_timeout());
    let tesseract = Tesseract::new().with_timeout(config.tool_timeout());
    DocumentExtractor::new(poppler.clone(), poppler.clone(), poppler, tesseract, config)
}
