//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the extraction logic and the
//! engines it drives (PDF text layer, table detection, rasterization, OCR,
//! language model). Implementations live in other crates.

use crate::Token;
use std::future::Future;
use std::path::Path;

/// Source of positioned words for the pages of a paged document
///
/// Implemented by the infrastructure layer (ledgerline-layout)
pub trait PageWords {
    /// Error type for word extraction
    type Error;

    /// Number of pages in the document
    fn page_count(&self, document: &Path) -> Result<usize, Self::Error>;

    /// Words on one page (1-based), in no particular order
    fn words(&self, document: &Path, page: usize) -> Result<Vec<Token>, Self::Error>;
}

/// Table detection over a single page, in "stream" (whitespace-separated) mode
///
/// Implemented by the infrastructure layer (ledgerline-layout)
pub trait TableRecognizer {
    /// Error type for table detection
    type Error;

    /// Rows of cell strings for every table found on the page (1-based)
    fn detect_tables(&self, document: &Path, page: usize) -> Result<Vec<Vec<String>>, Self::Error>;
}

/// Renders one page of a paged document to an image
///
/// Implemented by the infrastructure layer (ledgerline-layout)
pub trait PageRasterizer {
    /// Error type for rasterization
    type Error;

    /// PNG bytes of the page (1-based) rendered at `dpi`
    fn rasterize(&self, document: &Path, page: usize, dpi: u32) -> Result<Vec<u8>, Self::Error>;
}

/// Page segmentation hint passed to the OCR engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentationMode {
    /// A single uniform block of text, read line by line
    SingleBlock,
    /// Let the engine analyse the page layout itself
    Auto,
}

/// Optical character recognition over an image
///
/// Implemented by the infrastructure layer (ledgerline-layout)
pub trait OcrEngine {
    /// Error type for recognition
    type Error;

    /// Recognize the text in an encoded image
    fn recognize(&self, image: &[u8], mode: SegmentationMode) -> Result<String, Self::Error>;
}

/// Text returned by a text-to-structured-data engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    /// Raw response text
    pub text: String,
    /// Tokens billed for the call (0 when the engine does not report usage)
    pub tokens_used: u64,
}

/// Converts free text into structured JSON candidates
///
/// Implemented by the infrastructure layer (ledgerline-llm)
pub trait TextToStructuredData {
    /// Error type for completion calls
    type Error;

    /// Run one completion with a fixed system prompt and a user prompt.
    ///
    /// Dropping the returned future abandons the call: an implementation
    /// must not keep working (or billing) once its caller stops polling.
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send;
}
