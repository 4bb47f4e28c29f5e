//! Per-page extraction fallback chain
//!
//! Each page is tried with three strategies in strict priority order:
//!
//! 1. **Positional**: word boxes → rows → header → columns
//! 2. **StructuredTable**: stream-mode table detection, cells joined with ` | `
//! 3. **Ocr**: rasterize at high resolution and OCR as one line-oriented block
//!
//! The chain commits to the first strategy whose stripped yield reaches the
//! minimum character count, or to the last strategy's yield when none does.
//! A collaborator failure counts as an empty yield; it never aborts the page.

use crate::columns::FIELD_SEPARATOR;
use crate::config::LayoutConfig;
use crate::keywords::KeywordTable;
use crate::positional::PositionalReconstructor;
use ledgerline_domain::traits::{
    OcrEngine, PageRasterizer, PageWords, SegmentationMode, TableRecognizer,
};
use std::fmt::{self, Display};
use std::path::Path;
use tracing::{debug, info, warn};

/// An extraction strategy in the per-page chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStrategy {
    /// Word-box layout reconstruction
    Positional,
    /// Stream-mode table detection
    StructuredTable,
    /// Rasterize and OCR
    Ocr,
}

impl PageStrategy {
    /// Strategies in the order they are tried
    pub const CHAIN: [PageStrategy; 3] = [
        PageStrategy::Positional,
        PageStrategy::StructuredTable,
        PageStrategy::Ocr,
    ];

    /// Get the strategy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStrategy::Positional => "positional",
            PageStrategy::StructuredTable => "table",
            PageStrategy::Ocr => "ocr",
        }
    }
}

impl fmt::Display for PageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The text a page committed to, and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct PageYield {
    /// 1-based page number
    pub page: usize,
    /// Strategy the chain committed to
    pub strategy: PageStrategy,
    /// Recovered text (may be short or empty when every strategy fell short)
    pub text: String,
    /// Set when the text is an OCR error marker rather than recognized text
    pub ocr_failed: bool,
}

impl PageYield {
    /// Character count of the trimmed text; zero for an OCR error marker
    pub fn content_chars(&self) -> usize {
        if self.ocr_failed {
            0
        } else {
            self.text.trim().chars().count()
        }
    }

    /// Text prefixed with its page marker
    pub fn render(&self) -> String {
        format!("\n--- PAGE {} ---\n{}", self.page, self.text)
    }
}

/// Inline marker used in place of text when OCR fails
pub fn ocr_error_marker(message: impl Display) -> String {
    format!("[OCR ERROR: {}]", message)
}

/// Runs the three page strategies against their collaborators
pub struct FallbackChain<W, T, R, O> {
    words: W,
    tables: T,
    rasterizer: R,
    ocr: O,
    positional: PositionalReconstructor<'static>,
    config: LayoutConfig,
}

impl<W, T, R, O> FallbackChain<W, T, R, O>
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
    /// Create a chain over the given collaborators
    pub fn new(words: W, tables: T, rasterizer: R, ocr: O, config: LayoutConfig) -> Self {
        Self {
            words,
            tables,
            rasterizer,
            ocr,
            positional: PositionalReconstructor::new(config.row_tolerance, KeywordTable::standard()),
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Word source used for page counting and positional extraction
    pub fn words(&self) -> &W {
        &self.words
    }

    /// OCR engine, also used directly for raster images
    pub fn ocr(&self) -> &O {
        &self.ocr
    }

    /// Extract one page, falling back until a strategy yields enough text
    pub fn run_page(&self, document: &Path, page: usize) -> PageYield {
        let mut last: Option<PageYield> = None;

        for strategy in PageStrategy::CHAIN {
            let (text, ocr_failed) = self.run_strategy(strategy, document, page);
            let candidate = PageYield {
                page,
                strategy,
                text,
                ocr_failed,
            };
            let chars = candidate.content_chars();

            if chars >= self.config.min_page_chars {
                info!("Page {}: committed to {} ({} chars)", page, strategy, chars);
                return candidate;
            }

            debug!(
                "Page {}: {} yielded {} chars (< {}), falling back",
                page, strategy, chars, self.config.min_page_chars
            );
            last = Some(candidate);
        }

        let exhausted = last.unwrap_or(PageYield {
            page,
            strategy: PageStrategy::Ocr,
            text: String::new(),
            ocr_failed: false,
        });
        warn!(
            "Page {}: no strategy reached {} chars, keeping {} yield",
            page, self.config.min_page_chars, exhausted.strategy
        );
        exhausted
    }

    fn run_strategy(&self, strategy: PageStrategy, document: &Path, page: usize) -> (String, bool) {
        match strategy {
            PageStrategy::Positional => match self.words.words(document, page) {
                Ok(tokens) => (self.positional.reconstruct(tokens), false),
                Err(e) => {
                    warn!("Page {}: word extraction failed: {}", page, e);
                    (String::new(), false)
                }
            },
            PageStrategy::StructuredTable => match self.tables.detect_tables(document, page) {
                Ok(rows) => (join_table_rows(&rows), false),
                Err(e) => {
                    warn!("Page {}: table detection failed: {}", page, e);
                    (String::new(), false)
                }
            },
            PageStrategy::Ocr => match self.ocr_page(document, page) {
                Ok(text) => (text, false),
                Err(message) => {
                    warn!("Page {}: OCR failed: {}", page, message);
                    (ocr_error_marker(message), true)
                }
            },
        }
    }

    fn ocr_page(&self, document: &Path, page: usize) -> Result<String, String> {
        let image = self
            .rasterizer
            .rasterize(document, page, self.config.ocr_dpi)
            .map_err(|e| e.to_string())?;
        self.ocr
            .recognize(&image, SegmentationMode::SingleBlock)
            .map_err(|e| e.to_string())
    }
}

/// Join table rows as pipe-delimited lines, trimming every cell
pub fn join_table_rows(rows: &[Vec<String>]) -> String {
    rows.iter()
        .map(|cells| {
            cells
                .iter()
                .map(|c| c.trim())
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
