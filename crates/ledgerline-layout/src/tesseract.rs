//! tesseract OCR adapter

use crate::error::LayoutError;
use crate::tools::{path_arg, ToolRunner};
use ledgerline_domain::traits::{OcrEngine, SegmentationMode};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Default recognition language
pub const DEFAULT_LANGUAGE: &str = "eng";

/// OCR through the `tesseract` command-line tool
#[derive(Debug, Clone)]
pub struct Tesseract {
    runner: ToolRunner,
    language: String,
}

impl Tesseract {
    /// Use `tesseract` from `PATH` with English
    pub fn new() -> Self {
        Self {
            runner: ToolRunner::default(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Use `tesseract` from a specific directory
    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.runner = self.runner.with_bin_dir(bin_dir.into());
        self
    }

    /// Kill a recognition still running after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    /// Set the recognition language (e.g. "eng", "eng+fra")
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether `tesseract` can be started
    pub fn is_available(&self) -> bool {
        self.runner.available("tesseract", "--version")
    }

    fn psm(mode: SegmentationMode) -> &'static str {
        match mode {
            SegmentationMode::SingleBlock => "6",
            SegmentationMode::Auto => "3",
        }
    }
}

impl Default for Tesseract {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for Tesseract {
    type Error = LayoutError;

    fn recognize(&self, image: &[u8], mode: SegmentationMode) -> Result<String, Self::Error> {
        let mut input = tempfile::Builder::new()
            .prefix("ledgerline-ocr")
            .suffix(".png")
            .tempfile()?;
        input.write_all(image)?;
        input.flush()?;

        self.runner.run(
            "tesseract",
            [
                path_arg(input.path())?,
                "stdout",
                "-l",
                self.language.as_str(),
                "--psm",
                Self::psm(mode),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_settings() {
        let ocr = Tesseract::new().with_language("eng+fra");
        assert_eq!(ocr.language, "eng+fra");
        assert_eq!(Tesseract::psm(SegmentationMode::SingleBlock), "6");
        assert_eq!(Tesseract::psm(SegmentationMode::Auto), "3");
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let ocr = Tesseract::new().with_bin_dir("/nonexistent/ledgerline/bin");
        let result = ocr.recognize(b"not really a png", SegmentationMode::SingleBlock);
        assert!(matches!(result, Err(LayoutError::Tool { tool: "tesseract", .. })));
    }
}
