//! Brute-force top-K similarity search.
//!
//! A linear scan over the full record set, O(N·D) per query. No index
//! structure is built; the target collection size is small enough that
//! scoring every record inline is cheaper than maintaining one.

use crate::domain::{SearchHit, TermRecord};
use crate::embedding::Embedding;

/// Default number of results returned when the caller does not ask for
/// a specific K.
pub const DEFAULT_TOP_K: usize = 5;

/// Returns the `k` records most similar to `query`, best first.
///
/// Records whose embedding dimensionality does not match the query are
/// skipped rather than failing the whole search. Ties keep insertion
/// order (stable sort). Zero-vector embeddings score `NEG_INFINITY` and
/// therefore always rank last. If `k` exceeds the number of scorable
/// records, every scorable record is returned.
pub fn top_k(query: &Embedding, records: &[TermRecord], k: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = records
        .iter()
        .filter_map(|record| {
            let score = query.cosine_similarity(&record.embedding)?;
            Some(SearchHit {
                record: record.clone(),
                score,
            })
        })
        .collect();

    // Vec::sort_by is stable, so equal scores keep insertion order.
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(k);
    hits
}
