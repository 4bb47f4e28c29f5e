//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{Extractor, ExtractorConfig, ExtractorError, SalvageStrategy};
    use ledgerline_domain::traits::{Completion, TextToStructuredData};
    use ledgerline_llm::MockProvider;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Provider that answers only after `delay`, recording what it got to do
    #[derive(Clone, Default)]
    struct SlowProvider {
        delay: Duration,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
        billed_tokens: Arc<AtomicU64>,
    }

    /// Decrements the in-flight count however the call ends
    struct InFlight(Arc<AtomicUsize>);

    impl Drop for InFlight {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl SlowProvider {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }
    }

    impl TextToStructuredData for SlowProvider {
        type Error = ExtractorError;

        async fn complete(&self, _system: &str, _user: &str) -> Result<Completion, Self::Error> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let _guard = InFlight(Arc::clone(&self.in_flight));

            tokio::time::sleep(self.delay).await;

            // Only a call that ran to completion costs anything
            self.billed_tokens.fetch_add(99, Ordering::SeqCst);
            Ok(Completion {
                text: r#"[{"date": "late"}]"#.to_string(),
                tokens_used: 99,
            })
        }
    }

    #[tokio::test]
    async fn test_timeout_is_a_chunk_failure() {
        let config = ExtractorConfig {
            completion_timeout_secs: 1,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(SlowProvider::new(Duration::from_millis(1500)), config).unwrap();

        let result = extractor.extract("01/12/2025 | POS | 100 |  | 900").await;

        assert!(result.transactions.is_empty());
        assert_eq!(result.metadata.chunk_failures(), 1);
        assert_eq!(result.metadata.chunks[0].error.as_deref(), Some("Extraction timeout"));
        assert_eq!(result.metadata.tokens_used, 0);
    }

    #[tokio::test]
    async fn test_timed_out_calls_are_abandoned() {
        let llm = SlowProvider::new(Duration::from_millis(1600));
        let config = ExtractorConfig {
            chunk_size: 10,
            completion_timeout_secs: 1,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(llm.clone(), config).unwrap();

        let result = extractor.extract("aaaaaaaa\nbbbbbbbb\ncccccccc").await;

        assert_eq!(result.metadata.chunks.len(), 3);
        assert_eq!(result.metadata.chunk_failures(), 3);
        // Each call was cancelled before the next chunk started
        assert_eq!(llm.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(llm.in_flight.load(Ordering::SeqCst), 0);

        // Nothing keeps running in the background to bill tokens later
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(llm.billed_tokens.load(Ordering::SeqCst), 0);
        assert_eq!(result.metadata.tokens_used, 0);
    }

    #[test]
    fn test_full_extraction_flow_blocking() {
        let llm = MockProvider::new(
            r#"Sure! Here are the rows:
[
  {"date": "01/12/2025", "value_date": "01/12/2025", "description": "Opening", "debit": "0", "credit": "0", "balance": "1,000.00"},
  {"date": "02/12/2025", "value_date": "02/12/2025", "description": "POS Shoprite", "debit": "200.00", "credit": "", "balance": "800.00"},
  {"date": "03/12/2025", "value_date": "03/12/2025", "description": "Salary", "debit": "-", "credit": "₦500.00", "balance": "1,300.00"}
]"#,
        );
        let extractor = Extractor::new(llm, ExtractorConfig::default()).unwrap();

        let result = tokio_test::block_on(extractor.extract("statement text"));

        assert_eq!(result.transactions.len(), 3);
        assert_eq!(result.metadata.chunks[0].strategy, Some(SalvageStrategy::BracketSearch));
        assert_eq!(result.transactions[1].debit, 200.0);
        assert_eq!(result.transactions[2].credit, 500.0);
        assert_eq!(result.transactions[2].balance, 1300.0);
    }

    #[tokio::test]
    async fn test_extraction_with_invalid_json() {
        let llm = MockProvider::new("This is not JSON");
        let extractor = Extractor::new(llm, ExtractorConfig::default()).unwrap();

        let result = extractor.extract("some statement text").await;

        // Unparseable responses are not errors; they contribute nothing
        assert!(result.transactions.is_empty());
        assert_eq!(result.metadata.chunk_failures(), 0);
        assert_eq!(result.metadata.chunks[0].strategy, None);
    }
}
