//! Document → report orchestration

use crate::bank::detect_bank;
use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::types::{PageProvenance, StatementReport};
use ledgerline_domain::traits::TextToStructuredData;
use ledgerline_domain::StatementSummary;
use ledgerline_layout::{DocumentSource, DocumentText};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Runs a statement from file to report
///
/// ```text
/// file → DocumentSource → page-marked text → Extractor → transactions → report
/// ```
pub struct StatementPipeline<D, L> {
    document: Arc<D>,
    extractor: Extractor<L>,
}

impl<D, L> StatementPipeline<D, L>
where
    D: DocumentSource + Send + Sync + 'static,
    L: TextToStructuredData,
    L::Error: Display,
{
    /// Create a pipeline from a document source and an extractor
    pub fn new(document: D, extractor: Extractor<L>) -> Self {
        Self {
            document: Arc::new(document),
            extractor,
        }
    }

    /// The text extractor
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    /// Recover the document text only
    pub async fn extract_text(&self, path: &Path) -> Result<DocumentText, ExtractorError> {
        if !path.exists() {
            return Err(ExtractorError::NotFound(path.to_path_buf()));
        }

        let document = Arc::clone(&self.document);
        let owned = path.to_path_buf();

        // Subprocess-heavy; keep it off the async workers
        let text = tokio::task::spawn_blocking(move || document.extract(&owned)).await??;
        Ok(text)
    }

    /// Process a statement into a report
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Layout` when the file cannot be read as a statement
    /// - `NoContent` when no page yielded usable text
    /// - `NoTransactions` when text was recovered but held no records
    pub async fn process(&self, path: &Path) -> Result<StatementReport, ExtractorError> {
        let document = self.extract_text(path).await?;

        let chars = document.content_chars();
        if chars < self.extractor.config().min_document_chars {
            return Err(ExtractorError::NoContent { chars });
        }

        let text = document.render();
        let result = self.extractor.extract(&text).await;
        if result.transactions.is_empty() {
            return Err(ExtractorError::NoTransactions);
        }

        let bank = detect_bank(&text).to_string();
        info!("{}: {} transaction(s), bank {}", path.display(), result.transactions.len(), bank);

        Ok(StatementReport {
            bank,
            source: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            summary: StatementSummary::from_transactions(&result.transactions),
            pages: document
                .pages
                .iter()
                .map(|p| PageProvenance {
                    page: p.page,
                    strategy: p.strategy,
                })
                .collect(),
            transactions: result.transactions,
            metadata: result.metadata,
        })
    }
}
