//! Whole-document text recovery
//!
//! A document is either paged (PDF, run page by page through the fallback
//! chain) or a single raster image (OCR'd directly). The result keeps the
//! per-page provenance next to the rendered text.

use crate::chain::{ocr_error_marker, FallbackChain, PageStrategy, PageYield};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use ledgerline_domain::traits::{
    OcrEngine, PageRasterizer, PageWords, SegmentationMode, TableRecognizer,
};
use std::fmt::Display;
use std::path::Path;
use tracing::{info, warn};

/// Raster image extensions accepted for direct OCR
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp"];

/// What kind of document a path names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Multi-page PDF
    Paged,
    /// Single raster image
    Image,
}

impl DocumentKind {
    /// Classify a path by its (case-insensitive) extension
    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ext == "pdf" {
            Ok(DocumentKind::Paged)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(DocumentKind::Image)
        } else if ext.is_empty() {
            Err(LayoutError::UnsupportedDocument("(no extension)".to_string()))
        } else {
            Err(LayoutError::UnsupportedDocument(format!(".{}", ext)))
        }
    }
}

/// Text recovered from a document, with per-page provenance
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentText {
    /// Kind of the source document
    pub kind: DocumentKind,
    /// Committed yield for every page, in page order (one entry for images)
    pub pages: Vec<PageYield>,
}

impl DocumentText {
    /// Render the document text.
    ///
    /// Paged documents get a page marker before every page; images are
    /// returned as recognized.
    pub fn render(&self) -> String {
        match self.kind {
            DocumentKind::Paged => self
                .pages
                .iter()
                .map(PageYield::render)
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentKind::Image => self
                .pages
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Usable characters across all pages, excluding markers and OCR errors
    pub fn content_chars(&self) -> usize {
        self.pages.iter().map(PageYield::content_chars).sum()
    }

    /// Committed strategy per page
    pub fn strategies(&self) -> Vec<(usize, PageStrategy)> {
        self.pages.iter().map(|p| (p.page, p.strategy)).collect()
    }
}

/// Document source interface: turn a file into text
pub trait DocumentSource {
    /// Recover the text of the document at `path`
    fn extract(&self, path: &Path) -> Result<DocumentText, LayoutError>;
}

/// Document source built on the per-page fallback chain
pub struct DocumentExtractor<W, T, R, O> {
    chain: FallbackChain<W, T, R, O>,
}

impl<W, T, R, O> DocumentExtractor<W, T, R, O>
where
    W: PageWords,
    T: TableRecognizer,
    R: PageRasterizer,
    O: OcrEngine,
    W::Error: Display,
    T::Error: Display,
    R::Error: Display,
    O::Error: Display,
{
    /// Create an extractor over the given collaborators
    pub fn new(words: W, tables: T, rasterizer: R, ocr: O, config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate().map_err(LayoutError::Config)?;
        Ok(Self {
            chain: FallbackChain::new(words, tables, rasterizer, ocr, config),
        })
    }

    /// The underlying fallback chain
    pub fn chain(&self) -> &FallbackChain<W, T, R, O> {
        &self.chain
    }

    fn extract_paged(&self, path: &Path) -> Result<DocumentText, LayoutError> {
        let page_count = self
            .chain
            .words()
            .page_count(path)
            .map_err(|e| LayoutError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        info!("Extracting {} page(s) from {}", page_count, path.display());

        let pages = (1..=page_count)
            .map(|page| self.chain.run_page(path, page))
            .collect();

        Ok(DocumentText {
            kind: DocumentKind::Paged,
            pages,
        })
    }

    fn extract_image(&self, path: &Path) -> Result<DocumentText, LayoutError> {
        let image = std::fs::read(path).map_err(|e| LayoutError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let (text, ocr_failed) = match self.chain.ocr().recognize(&image, SegmentationMode::SingleBlock) {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("OCR failed for {}: {}", path.display(), e);
                (ocr_error_marker(e), true)
            }
        };

        Ok(DocumentText {
            kind: DocumentKind::Image,
            pages: vec![PageYield {
                page: 1,
                strategy: PageStrategy::Ocr,
                text,
                ocr_failed,
            }],
        })
    }
}

impl<W, T, R, O> DocumentSource for DocumentExtractor<W, T, R, O>
where
    W: PageWords,
    T: TableRecognizer,
    R: PageRasterizer,
    O: OcrEngine,
    W::Error: Display,
    T::Error: Display,
    R::Error: Display,
    O::Error: Display,
{
    fn extract(&self, path: &Path) -> Result<DocumentText, LayoutError> {
        match DocumentKind::from_path(path)? {
            DocumentKind::Paged => self.extract_paged(path),
            DocumentKind::Image => self.extract_image(path),
        }
    }
}
