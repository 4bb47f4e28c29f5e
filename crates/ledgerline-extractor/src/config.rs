//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum chunk size (characters) sent in one completion call
    pub chunk_size: usize,

    /// Maximum time for a single completion call, retries included (seconds)
    pub completion_timeout_secs: u64,

    /// Usable characters a document must yield before it is sent for parsing
    pub min_document_chars: usize,
}

impl ExtractorConfig {
    /// Get the completion timeout as a Duration
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.completion_timeout_secs == 0 {
            return Err("completion_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            chunk_size: 6_000,
            completion_timeout_secs: 300,
            min_document_chars: 50,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: shorter timeouts, smaller chunks
    pub fn aggressive() -> Self {
        Self {
            chunk_size: 3_000,
            completion_timeout_secs: 120,
            min_document_chars: 50,
        }
    }

    /// Lenient preset: longer timeouts, larger chunks for long statements
    pub fn lenient() -> Self {
        Self {
            chunk_size: 12_000,
            completion_timeout_secs: 600,
            min_document_chars: 20,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
