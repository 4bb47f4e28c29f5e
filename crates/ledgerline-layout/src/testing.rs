//! In-memory collaborators
//!
//! Deterministic stand-ins for the word source, table recognizer, rasterizer
//! and OCR engine, so the fallback chain and everything built on it can be
//! exercised without poppler or tesseract installed.

use ledgerline_domain::traits::{
    OcrEngine, PageRasterizer, PageWords, SegmentationMode, TableRecognizer,
};
use ledgerline_domain::Token;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Error returned by the in-memory collaborators
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// Word source backed by a vector of pages
#[derive(Debug, Clone, Default)]
pub struct FakeWords {
    pages: Option<Vec<Vec<Token>>>,
}

impl FakeWords {
    /// One entry per page, in page order
    pub fn pages(pages: Vec<Vec<Token>>) -> Self {
        Self { pages: Some(pages) }
    }

    /// A source whose word extraction always fails (page count is 1)
    pub fn failing() -> Self {
        Self { pages: None }
    }
}

impl PageWords for FakeWords {
    type Error = FakeError;

    fn page_count(&self, _document: &Path) -> Result<usize, Self::Error> {
        Ok(self.pages.as_ref().map_or(1, Vec::len))
    }

    fn words(&self, _document: &Path, page: usize) -> Result<Vec<Token>, Self::Error> {
        let pages = self
            .pages
            .as_ref()
            .ok_or_else(|| FakeError("no text layer".to_string()))?;
        pages
            .get(page.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| FakeError(format!("page {} out of range", page)))
    }
}

/// Table recognizer backed by a vector of per-page tables
#[derive(Debug, Clone, Default)]
pub struct FakeTables {
    pages: Option<Vec<Vec<Vec<String>>>>,
}

impl FakeTables {
    /// One table (rows of cells) per page; missing pages have no tables
    pub fn pages(pages: Vec<Vec<Vec<String>>>) -> Self {
        Self { pages: Some(pages) }
    }

    /// A recognizer that always fails
    pub fn failing() -> Self {
        Self { pages: None }
    }
}

impl TableRecognizer for FakeTables {
    type Error = FakeError;

    fn detect_tables(&self, _document: &Path, page: usize) -> Result<Vec<Vec<String>>, Self::Error> {
        let pages = self
            .pages
            .as_ref()
            .ok_or_else(|| FakeError("table engine unavailable".to_string()))?;
        Ok(pages.get(page.wrapping_sub(1)).cloned().unwrap_or_default())
    }
}

/// Rasterizer that encodes the page number as the "image" bytes
#[derive(Debug, Clone, Default)]
pub struct FakeRasterizer {
    fail: bool,
}

impl FakeRasterizer {
    /// A rasterizer that always fails
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl PageRasterizer for FakeRasterizer {
    type Error = FakeError;

    fn rasterize(&self, _document: &Path, page: usize, _dpi: u32) -> Result<Vec<u8>, Self::Error> {
        if self.fail {
            return Err(FakeError("renderer unavailable".to_string()));
        }
        Ok(format!("page-{}", page).into_bytes())
    }
}

/// OCR engine returning canned text, optionally per rasterized page
#[derive(Debug, Clone)]
pub struct FakeOcr {
    default: Result<String, String>,
    per_page: HashMap<usize, String>,
    calls: Arc<AtomicUsize>,
}

impl FakeOcr {
    /// Recognize every image as `text`
    pub fn text(text: &str) -> Self {
        Self {
            default: Ok(text.to_string()),
            per_page: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail on every image
    pub fn failing() -> Self {
        Self {
            default: Err("tesseract not installed".to_string()),
            per_page: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Return `text` for images produced by [`FakeRasterizer`] for `page`
    pub fn with_page(mut self, page: usize, text: &str) -> Self {
        self.per_page.insert(page, text.to_string());
        self
    }

    /// Number of recognition calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for FakeOcr {
    type Error = FakeError;

    fn recognize(&self, image: &[u8], _mode: SegmentationMode) -> Result<String, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let page = std::str::from_utf8(image)
            .ok()
            .and_then(|s| s.strip_prefix("page-"))
            .and_then(|n| n.parse::<usize>().ok());
        if let Some(text) = page.and_then(|p| self.per_page.get(&p)) {
            return Ok(text.clone());
        }
        self.default.clone().map_err(FakeError)
    }
}
