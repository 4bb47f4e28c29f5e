//! Ledgerline LLM Provider Layer
//!
//! Implementations of the `TextToStructuredData` trait from
//! `ledgerline-domain`: the engine that turns a chunk of statement text into
//! JSON transaction candidates.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use ledgerline_llm::MockProvider;
//! use ledgerline_domain::traits::TextToStructuredData;
//!
//! let provider = MockProvider::new("[]");
//! let completion = tokio_test::block_on(provider.complete("system", "chunk text")).unwrap();
//! assert_eq!(completion.text, "[]");
//! ```

#![warn(missing_docs)]

pub mod openai;

use ledgerline_domain::traits::{Completion, TextToStructuredData};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use openai::{resolve_api_key, OpenAiConfig, OpenAiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing or rejected credentials, or an unusable provider setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::InvalidResponse(err.to_string())
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Text(String),
    Fail(String),
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses keyed by the user prompt, without any
/// network calls. Clones share responses and counters.
///
/// # Examples
///
/// ```
/// use ledgerline_llm::MockProvider;
/// use ledgerline_domain::traits::TextToStructuredData;
///
/// let provider = MockProvider::new("[]");
/// provider.add_response("chunk one", r#"[{"date": "01/12/2025"}]"#);
///
/// tokio_test::block_on(async {
///     assert_eq!(provider.complete("sys", "chunk one").await.unwrap().text, r#"[{"date": "01/12/2025"}]"#);
///     assert_eq!(provider.complete("sys", "chunk two").await.unwrap().text, "[]");
/// });
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Canned>>>,
    call_count: Arc<AtomicUsize>,
    tokens_per_call: Arc<AtomicU64>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            tokens_per_call: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Report `tokens` of usage on every successful call
    pub fn with_tokens_per_call(self, tokens: u64) -> Self {
        self.tokens_per_call.store(tokens, Ordering::SeqCst);
        self
    }

    fn responses(&self) -> MutexGuard<'_, HashMap<String, Canned>> {
        // Inserts are single operations, so a poisoned map is still consistent
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a specific response for a given user prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses()
            .insert(prompt.into(), Canned::Text(response.into()));
    }

    /// Configure to return an error for a specific user prompt
    pub fn add_error(&self, prompt: impl Into<String>, message: impl Into<String>) {
        self.responses()
            .insert(prompt.into(), Canned::Fail(message.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl TextToStructuredData for MockProvider {
    type Error = LlmError;

    async fn complete(&self, _system_prompt: &str, user_prompt: &str) -> Result<Completion, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let text = match self.responses().get(user_prompt) {
            Some(Canned::Fail(message)) => return Err(LlmError::Other(message.clone())),
            Some(Canned::Text(text)) => text.clone(),
            None => self.default_response.clone(),
        };

        Ok(Completion {
            text,
            tokens_used: self.tokens_per_call.load(Ordering::SeqCst),
        })
    }
}
