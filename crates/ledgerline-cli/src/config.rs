//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use ledgerline_extractor::ExtractorConfig;
use ledgerline_layout::LayoutConfig;
use ledgerline_llm::OpenAiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration: one section per library crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page layout and fallback chain settings
    pub layout: LayoutConfig,

    /// Chunking and timeout settings
    pub extractor: ExtractorConfig,

    /// Model provider settings
    pub llm: OpenAiConfig,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".ledgerline").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path falls back to
    /// built-in defaults when no file is there.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.layout
            .validate()
            .map_err(|e| CliError::Config(format!("[layout] {}", e)))?;
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("[extractor] {}", e)))?;
        self.llm
            .validate()
            .map_err(|e| CliError::Config(format!("[llm] {}", e)))?;

        let budget = self.llm.retry_budget();
        if budget > self.extractor.completion_timeout() {
            return Err(CliError::Config(format!(
                "[extractor] completion_timeout_secs ({}) is shorter than the {}s a provider call may take \
                 ({} attempt(s) of up to {}s plus backoff); raise it or lower [llm] timeout_secs/max_retries",
                self.extractor.completion_timeout_secs,
                budget.as_secs(),
                self.llm.max_retries,
                self.llm.timeout_secs
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply_overrides(&mut self, chunk_size: Option<usize>, model: Option<String>) -> Result<()> {
        if let Some(chunk_size) = chunk_size {
            self.extractor.chunk_size = chunk_size;
        }
        if let Some(model) = model {
            self.llm.model = model;
        }
        self.validate()
    }
}
