//! Ingestion pipeline.
//!
//! Orchestrates enrichment, embedding, and store append for one or
//! many text blocks. Batch ingestion runs blocks sequentially, so at
//! most one enrichment call is in flight at a time (the external
//! service is rate limited).

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{TermId, TermRecord};
use crate::providers::ai::{EnrichmentError, EnrichmentProvider};
use crate::storage::{StoreError, TermStore};

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The enrichment service call failed or returned garbage.
    #[error("enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    /// The store rejected or failed to persist the record.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The input text was empty after trimming.
    #[error("text block is empty")]
    EmptyInput,
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Outcome of a batch ingestion run.
///
/// Blank blocks are dropped before enrichment and appear in neither
/// count; `skipped` counts blocks whose processing failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchOutcome {
    /// Records successfully added to the store.
    pub added: usize,
    /// Blocks skipped because of a per-block failure.
    pub skipped: usize,
}

/// Backoff before the single retry a transport failure gets in batch mode.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Orchestrates text → structured record → embedded record → store.
#[derive(Clone)]
pub struct IngestService {
    provider: Arc<dyn EnrichmentProvider>,
    store: TermStore,
}

impl IngestService {
    /// Creates the pipeline over the given provider and store.
    pub fn new(provider: Arc<dyn EnrichmentProvider>, store: TermStore) -> Self {
        Self { provider, store }
    }

    /// Ingests a single text block and returns the created record.
    ///
    /// Errors surface directly; single-text callers get the failure,
    /// not a skip counter.
    pub async fn ingest(&self, text: &str) -> IngestResult<TermRecord> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IngestError::EmptyInput);
        }

        let fields = self.provider.structure(text).await?;
        // Embed the extracted meaning, not the raw surface text.
        let embedding = self.provider.embed(&fields.embedding_text()).await?;

        let record = TermRecord::new(TermId::generate(), fields, embedding);
        self.store.append(record.clone()).await?;

        tracing::debug!(id = %record.id, term = %record.term, "record ingested");
        Ok(record)
    }

    /// Ingests many blocks sequentially.
    ///
    /// Per-block failures are logged and counted, never abort the
    /// batch. A retryable enrichment failure gets one retry after a
    /// short backoff; structuring failures do not.
    pub async fn ingest_many(&self, blocks: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for block in blocks {
            if block.trim().is_empty() {
                continue;
            }

            match self.ingest_with_retry(block).await {
                Ok(_) => outcome.added += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping block after ingestion failure");
                    outcome.skipped += 1;
                }
            }
        }

        tracing::info!(
            added = outcome.added,
            skipped = outcome.skipped,
            "batch ingestion finished"
        );
        outcome
    }

    async fn ingest_with_retry(&self, text: &str) -> IngestResult<TermRecord> {
        match self.ingest(text).await {
            Err(IngestError::Enrichment(e)) if e.is_retryable() => {
                tracing::debug!(error = %e, "retrying block after transport failure");
                tokio::time::sleep(RETRY_BACKOFF).await;
                self.ingest(text).await
            }
            other => other,
        }
    }
}
