//! Core Extractor implementation

use crate::chunking::TextChunker;
use crate::config::ExtractorConfig;
use crate::dedup::Deduplicator;
use crate::error::ExtractorError;
use crate::normalize::RecordNormalizer;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::salvage::{ResponseSalvager, SalvageStrategy};
use crate::types::{ChunkOutcome, ExtractionMetadata, ExtractionResult};
use ledgerline_domain::traits::TextToStructuredData;
use ledgerline_domain::Transaction;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Salvage and normalize one response, without duplicate removal
pub fn salvage_transactions(response: &str) -> (Option<SalvageStrategy>, Vec<Transaction>) {
    let salvaged = ResponseSalvager::new().salvage(response);
    let transactions = RecordNormalizer::new().normalize_all(&salvaged.candidates);
    (salvaged.strategy, transactions)
}

/// The Extractor turns document text into de-duplicated transactions
///
/// Text is chunked, each chunk is sent to the provider in order, and every
/// response goes through salvage and normalization. A failed or timed-out
/// chunk contributes no records; it never aborts the run. A timed-out call
/// is dropped before the next chunk starts, so at most one call is in flight.
pub struct Extractor<L> {
    provider: L,
    config: ExtractorConfig,
    chunker: TextChunker,
    deduplicator: Deduplicator,
    tokens_used: AtomicU64,
    model_name: String,
}

impl<L> Extractor<L>
where
    L: TextToStructuredData,
    L::Error: Display,
{
    /// Create a new Extractor
    pub fn new(provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            provider,
            chunker: TextChunker::new(config.chunk_size),
            config,
            deduplicator: Deduplicator::new(),
            tokens_used: AtomicU64::new(0),
            model_name: "llm".to_string(),
        })
    }

    /// Create a new Extractor with a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Model name reported in metadata
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Tokens reported by the provider over the lifetime of this extractor
    pub fn tokens_used(&self) -> u64 {
        self.tokens_used.load(Ordering::SeqCst)
    }

    /// Extract transactions from document text
    pub async fn extract(&self, text: &str) -> ExtractionResult {
        let start_time = Instant::now();
        let tokens_before = self.tokens_used();
        let chunks = self.chunker.chunk(text);

        info!(
            "Parsing {} chars in {} chunk(s) with model '{}'",
            text.chars().count(),
            chunks.len(),
            self.model_name
        );

        let mut all_rows = Vec::new();
        let mut outcomes = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let (rows, outcome) = self.parse_chunk(i + 1, chunk).await;
            all_rows.extend(rows);
            outcomes.push(outcome);
        }

        let candidates_before_dedup = all_rows.len();
        let transactions = self.deduplicator.dedup(all_rows);
        let tokens_used = self.tokens_used() - tokens_before;

        info!(
            "Extracted {} transaction(s) ({} duplicate(s) removed), {} tokens used",
            transactions.len(),
            candidates_before_dedup - transactions.len(),
            tokens_used
        );

        ExtractionResult {
            metadata: ExtractionMetadata {
                model_name: self.model_name.clone(),
                text_chars: text.chars().count(),
                chunks: outcomes,
                candidates_before_dedup,
                duplicates_removed: candidates_before_dedup - transactions.len(),
                tokens_used,
                processing_time_ms: start_time.elapsed().as_millis() as u64,
            },
            transactions,
        }
    }

    /// Parse one chunk; failures become an empty outcome
    async fn parse_chunk(&self, index: usize, chunk: &str) -> (Vec<Transaction>, ChunkOutcome) {
        let prompt = PromptBuilder::new(chunk).build();
        debug!("Chunk {}: prompt length {} chars", index, prompt.len());

        let mut outcome = ChunkOutcome {
            index,
            chars: chunk.chars().count(),
            records: 0,
            strategy: None,
            error: None,
        };

        let call = self.provider.complete(SYSTEM_PROMPT, &prompt);
        let completion = match timeout(self.config.completion_timeout(), call).await {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => {
                let e = ExtractorError::Llm(e.to_string());
                warn!("Chunk {}: {}", index, e);
                outcome.error = Some(e.to_string());
                return (Vec::new(), outcome);
            }
            Err(_) => {
                warn!(
                    "Chunk {}: no response within {}s",
                    index, self.config.completion_timeout_secs
                );
                outcome.error = Some(ExtractorError::Timeout.to_string());
                return (Vec::new(), outcome);
            }
        };

        self.tokens_used.fetch_add(completion.tokens_used, Ordering::SeqCst);

        let (strategy, rows) = salvage_transactions(&completion.text);
        if strategy.is_none() {
            warn!("Chunk {}: response held no recoverable records", index);
        }
        info!("Chunk {}: {} transaction(s)", index, rows.len());

        outcome.records = rows.len();
        outcome.strategy = strategy;
        (rows, outcome)
    }
}
