//! Semantic search over the term store.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::SearchHit;
use crate::embedding::{top_k, DEFAULT_TOP_K};
use crate::providers::ai::{EnrichmentError, EnrichmentProvider};
use crate::storage::TermStore;

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Embedding the query failed.
    #[error("enrichment failed: {0}")]
    Enrichment(#[from] EnrichmentError),
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Embeds a query and ranks the stored records against it.
#[derive(Clone)]
pub struct SearchService {
    provider: Arc<dyn EnrichmentProvider>,
    store: TermStore,
}

impl SearchService {
    /// Creates the search service over the given provider and store.
    pub fn new(provider: Arc<dyn EnrichmentProvider>, store: TermStore) -> Self {
        Self { provider, store }
    }

    /// Returns the `k` records most similar to the query text.
    ///
    /// `k` defaults to [`DEFAULT_TOP_K`]. The record snapshot is taken
    /// once, so results reflect a consistent view of the store.
    pub async fn search(&self, query: &str, k: Option<usize>) -> SearchResult<Vec<SearchHit>> {
        let embedding = self.provider.embed(query).await?;
        let records = self.store.all().await;
        let hits = top_k(&embedding, &records, k.unwrap_or(DEFAULT_TOP_K));

        tracing::debug!(query_len = query.len(), hits = hits.len(), "search completed");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TermFields, TermId, TermRecord};
    use crate::embedding::Embedding;
    use crate::providers::ai::MockEnrichmentProvider;

    fn record(id: &str, values: &[f32]) -> TermRecord {
        TermRecord::new(
            TermId::from(id),
            TermFields {
                term: id.to_string(),
                ..Default::default()
            },
            Embedding::new(values.to_vec()),
        )
    }

    async fn seeded_store() -> (tempfile::TempDir, TermStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();

        store.append(record("far", &[0.0, 1.0])).await.unwrap();
        store.append(record("near", &[0.9, 0.1])).await.unwrap();
        store.append(record("exact", &[1.0, 0.0])).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn identical_embedding_ranks_first_with_unit_score() {
        let mut provider = MockEnrichmentProvider::new();
        provider
            .expect_embed()
            .returning(|_| Ok(Embedding::new(vec![1.0, 0.0])));

        let (_dir, store) = seeded_store().await;
        let service = SearchService::new(Arc::new(provider), store);
        let hits = service.search("exact", None).await.unwrap();

        assert_eq!(hits[0].record.id, TermId::from("exact"));
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn k_limits_results() {
        let mut provider = MockEnrichmentProvider::new();
        provider
            .expect_embed()
            .returning(|_| Ok(Embedding::new(vec![1.0, 0.0])));

        let (_dir, store) = seeded_store().await;
        let service = SearchService::new(Arc::new(provider), store);
        let hits = service.search("anything", Some(2)).await.unwrap();

        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn embed_failure_propagates() {
        let mut provider = MockEnrichmentProvider::new();
        provider.expect_embed().returning(|_| {
            Err(EnrichmentError::Api {
                status: 500,
                message: "boom".into(),
            })
        });

        let (_dir, store) = seeded_store().await;
        let service = SearchService::new(Arc::new(provider), store);
        let err = service.search("anything", None).await.unwrap_err();

        assert!(matches!(err, SearchError::Enrichment(_)));
    }
}
