//! OpenAI-compatible Provider Implementation
//!
//! Sends each chunk to a `/chat/completions` endpoint with a fixed system
//! prompt and reads back the assistant message and token usage.
//!
//! # Features
//!
//! - Async HTTP communication (`reqwest`)
//! - Configurable endpoint, model, sampling and timeout
//! - Retry logic with exponential backoff
//! - API key from the environment or a `.env` file
//!
//! # Examples
//!
//! ```no_run
//! use ledgerline_llm::{OpenAiConfig, OpenAiProvider};
//!
//! use ledgerline_domain::traits::TextToStructuredData;
//!
//! # async fn run() {
//! let provider = OpenAiProvider::from_env(OpenAiConfig::default()).unwrap();
//! let completion = provider.complete("system rules", "chunk text").await.unwrap();
//! println!("{} ({} tokens)", completion.text, completion.tokens_used);
//! # }
//! ```

use crate::LlmError;
use ledgerline_domain::traits::{Completion, TextToStructuredData};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default timeout for a single HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

/// Default number of attempts per completion
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Shortest string accepted as an API key
pub const MIN_API_KEY_LEN: usize = 20;

/// Configuration for the chat-completions provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL; `/chat/completions` is appended
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Sampling temperature (0.0 keeps extraction deterministic)
    pub temperature: f32,

    /// Per-request HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per completion before giving up
    pub max_retries: u32,

    /// Environment variable (or `.env` key) holding the API key
    pub api_key_env: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 8192,
            temperature: 0.0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        Ok(())
    }

    /// Longest a single completion can take: every attempt timing out, plus
    /// the backoff sleeps between attempts
    pub fn retry_budget(&self) -> Duration {
        let attempts = self.timeout_secs.saturating_mul(u64::from(self.max_retries));
        let backoff = match self.max_retries {
            0 | 1 => 0,
            n => 1u64.checked_shl(n - 1).map_or(u64::MAX, |b| b - 1),
        };
        Duration::from_secs(attempts.saturating_add(backoff))
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

/// Resolve the API key named `var`.
///
/// The process environment wins; otherwise the last non-empty `var` entry
/// of the `dotenv` file (if given and readable) is used. Keys shorter than
/// [`MIN_API_KEY_LEN`] are rejected.
pub fn resolve_api_key(var: &str, dotenv: Option<&Path>) -> Result<String, LlmError> {
    let from_env = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
    let key = from_env.or_else(|| dotenv.and_then(|path| dotenv_value(path, var)));

    check_api_key(key, var)
}

fn check_api_key(key: Option<String>, var: &str) -> Result<String, LlmError> {
    match key.map(|k| k.trim().to_string()) {
        Some(key) if key.chars().count() >= MIN_API_KEY_LEN => Ok(key),
        Some(_) => Err(LlmError::Configuration(format!(
            "{} looks truncated (fewer than {} characters); set it to a valid API key",
            var, MIN_API_KEY_LEN
        ))),
        None => Err(LlmError::Configuration(format!(
            "{} is not set; export it or add `{}=<key>` to a .env file in the working directory",
            var, var
        ))),
    }
}

/// Value of `var` in a `.env` file; unreadable files and bad lines are skipped
fn dotenv_value(path: &Path, var: &str) -> Option<String> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };

    entries
        .filter_map(|entry| match entry {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!("Ignoring malformed line in {}: {}", path.display(), e);
                None
            }
        })
        .filter(|(name, value)| name == var && !value.trim().is_empty())
        .map(|(_, value)| value)
        .last()
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

/// Chat-completions provider for OpenAI and compatible servers
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    config: OpenAiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider with an explicit API key
    pub fn new(config: OpenAiConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Configuration)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider, reading the key from the environment or `./.env`
    pub fn from_env(config: OpenAiConfig) -> Result<Self, LlmError> {
        let key = resolve_api_key(&config.api_key_env, Some(Path::new(".env")))?;
        Self::new(config, key)
    }

    /// Model name sent with every request
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Run one completion
    ///
    /// # Errors
    ///
    /// - `Configuration` when the key is rejected (401/403)
    /// - `ModelNotAvailable` when the model is unknown (404)
    /// - `RateLimitExceeded` when every attempt was throttled (429)
    /// - `Communication` for network failures and other HTTP errors
    /// - `InvalidResponse` when the body is not a chat completion
    pub async fn complete_async(&self, system_prompt: &str, user_prompt: &str) -> Result<Completion, LlmError> {
        let url = self.url();
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: ChatResponse = response
                            .json()
                            .await
                            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
                        return Self::into_completion(body);
                    }

                    match status {
                        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                            return Err(LlmError::Configuration(format!(
                                "API key rejected (HTTP {}); check {}",
                                status.as_u16(),
                                self.config.api_key_env
                            )));
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        _ => {
                            let error_text = response
                                .text()
                                .await
                                .unwrap_or_else(|_| "Unknown error".to_string());
                            last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.saturating_pow(attempts - 1));
                warn!("Completion attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn into_completion(body: ChatResponse) -> Result<Completion, LlmError> {
        let tokens_used = body.usage.map_or(0, |u| u.total_tokens);
        let text = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!("Completion: {} chars, {} tokens", text.len(), tokens_used);
        Ok(Completion {
            text: text.trim().to_string(),
            tokens_used,
        })
    }
}

impl TextToStructuredData for OpenAiProvider {
    type Error = LlmError;

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<Completion, Self::Error> {
        self.complete_async(system_prompt, user_prompt).await
    }
}
