//! Configuration for layout extraction

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for page layout reconstruction and the fallback chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical distance (in page units) within which words share a row
    pub row_tolerance: f64,

    /// Minimum stripped characters a strategy must yield before the chain
    /// stops falling back
    pub min_page_chars: usize,

    /// Resolution used when rasterizing a page for OCR
    pub ocr_dpi: u32,

    /// Seconds an external tool (poppler, tesseract) may run before it is
    /// killed and its strategy counts as failed
    pub tool_timeout_secs: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 5.0,
            min_page_chars: 50,
            ocr_dpi: 300,
            tool_timeout_secs: 120,
        }
    }
}

impl LayoutConfig {
    /// Get the per-tool timeout as a Duration
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.row_tolerance > 0.0 && self.row_tolerance.is_finite()) {
            return Err("row_tolerance must be a positive number".to_string());
        }
        if self.ocr_dpi < 72 {
            return Err("ocr_dpi must be at least 72".to_string());
        }
        if self.tool_timeout_secs == 0 {
            return Err("tool_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.row_tolerance, 5.0);
        assert_eq!(config.min_page_chars, 50);
        assert_eq!(config.ocr_dpi, 300);
        assert_eq!(config.tool_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_zero_tool_timeout_is_rejected() {
        let config = LayoutConfig {
            tool_timeout_secs: 0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_tolerance() {
        let mut config = LayoutConfig::default();
        config.row_tolerance = 0.0;
        assert!(config.validate().is_err());
        config.row_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LayoutConfig::from_toml("ocr_dpi = 200").unwrap();
        assert_eq!(config.ocr_dpi, 200);
        assert_eq!(config.min_page_chars, 50);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LayoutConfig::default();
        let parsed = LayoutConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.row_tolerance, config.row_tolerance);
        assert_eq!(parsed.ocr_dpi, config.ocr_dpi);
    }
}
