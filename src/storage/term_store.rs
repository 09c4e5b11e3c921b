//! Durable, in-memory term record store.
//!
//! The single source of truth for listing and searching. Records live
//! in memory and are flushed to a JSON file after every mutation, so a
//! restart reconstructs the exact collection. File I/O runs on the
//! blocking thread pool; mutations are serialized behind an async
//! mutex so overlapping ingestions cannot lose appends.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{TermId, TermRecord};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("embedding dimension mismatch: store has {expected}, record has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("duplicate record id: {0}")]
    DuplicateId(TermId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Thread-safe, file-backed collection of term records.
///
/// Cloning is cheap; clones share the same collection and lock.
#[derive(Debug, Clone)]
pub struct TermStore {
    path: PathBuf,
    records: Arc<Mutex<Vec<TermRecord>>>,
}

impl TermStore {
    /// Opens the store backed by the given file, creating parent
    /// directories as needed.
    ///
    /// A missing file yields an empty collection. An unreadable or
    /// unparseable file also yields an empty collection, with a
    /// warning; a corrupt store must never prevent startup. Records whose
    /// embedding dimensionality disagrees with the first record are
    /// skipped, never silently truncated.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let load_path = path.clone();
        let records = tokio::task::spawn_blocking(move || Self::read_records(&load_path))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;

        let records = match records {
            Ok(records) => records,
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "store file is corrupt, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "term store opened"
        );

        Ok(Self {
            path,
            records: Arc::new(Mutex::new(records)),
        })
    }

    /// Reads and validates the backing file. Missing file = empty.
    fn read_records(path: &Path) -> StoreResult<Vec<TermRecord>> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<TermRecord> = serde_json::from_str(&contents)?;

        // Enforce uniform dimensionality; the first record establishes it.
        let Some(expected) = records.first().map(|r| r.embedding.dimension()) else {
            return Ok(records);
        };
        let (kept, skipped): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.embedding.dimension() == expected);
        for record in &skipped {
            tracing::warn!(
                id = %record.id,
                expected,
                actual = record.embedding.dimension(),
                "skipping record with mismatched embedding dimension"
            );
        }

        Ok(kept)
    }

    /// Appends a record and persists the full collection.
    ///
    /// The record's embedding must match the store's established
    /// dimensionality and its id must be unused; violations are
    /// rejected before anything is mutated. If persisting fails, the
    /// record stays in memory and the error reports that durability
    /// was not achieved; the next successful persist flushes it.
    pub async fn append(&self, record: TermRecord) -> StoreResult<()> {
        let mut records = self.records.lock().await;

        if let Some(first) = records.first() {
            let expected = first.embedding.dimension();
            let actual = record.embedding.dimension();
            if expected != actual {
                return Err(StoreError::DimensionMismatch { expected, actual });
            }
        }

        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        records.push(record);
        self.persist_locked(&records).await
    }

    /// Returns a snapshot of all records in insertion order.
    pub async fn all(&self) -> Vec<TermRecord> {
        self.records.lock().await.clone()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// The established embedding dimensionality, if any record exists.
    pub async fn dimension(&self) -> Option<usize> {
        self.records
            .lock()
            .await
            .first()
            .map(|r| r.embedding.dimension())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes the collection and atomically rewrites the backing
    /// file (write to a temp file in the same directory, then rename),
    /// so a crash mid-write cannot leave a half-written store.
    ///
    /// Callers must hold the record lock, which keeps append+persist
    /// one critical section.
    async fn persist_locked(&self, records: &[TermRecord]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        let path = self.path.clone();
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            std::fs::write(&tmp_path, json)?;
            std::fs::rename(&tmp_path, &path)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TermFields;
    use crate::embedding::Embedding;

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

    #[tokio::test]
    async fn opens_empty_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn append_then_all_preserves_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();

        for i in 0..5 {
            store.append(record(&format!("r{}", i), &[i as f32, 1.0])).await.unwrap();
        }

        let all = store.all().await;
        assert_eq!(all.len(), 5);
        let ids: Vec<String> = all.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["r0", "r1", "r2", "r3", "r4"]);
    }

    #[tokio::test]
    async fn persisted_collection_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");

        let store = TermStore::open(&path).await.unwrap();
        store.append(record("a", &[1.0, 0.0])).await.unwrap();
        store.append(record("b", &[0.0, 1.0])).await.unwrap();
        let before = store.all().await;

        let reloaded = TermStore::open(&path).await.unwrap();
        assert_eq!(reloaded.all().await, before);
    }

    #[tokio::test]
    async fn corrupt_file_recovers_to_empty_and_stays_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");
        std::fs::write(&path, "{ not valid json").unwrap();

        let store = TermStore::open(&path).await.unwrap();
        assert!(store.is_empty().await);

        store.append(record("a", &[1.0])).await.unwrap();
        let reloaded = TermStore::open(&path).await.unwrap();
        assert_eq!(reloaded.len().await, 1);
    }

    #[tokio::test]
    async fn rejects_mismatched_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();
        store.append(record("a", &[1.0, 0.0])).await.unwrap();

        let err = store.append(record("b", &[1.0, 0.0, 0.0])).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch { expected: 2, actual: 3 }
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn rejects_duplicate_id_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();
        store.append(record("a", &[1.0, 0.0])).await.unwrap();

        let err = store.append(record("a", &[0.0, 1.0])).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));

        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].embedding.values, vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn load_skips_records_with_mismatched_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");

        let good = record("good", &[1.0, 0.0]);
        let bad = record("bad", &[1.0, 0.0, 0.0]);
        let json = serde_json::to_string(&vec![good.clone(), bad]).unwrap();
        std::fs::write(&path, json).unwrap();

        let store = TermStore::open(&path).await.unwrap();
        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, good.id);
    }

    #[tokio::test]
    async fn dimension_reflects_first_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();
        assert_eq!(store.dimension().await, None);

        store.append(record("a", &[1.0, 0.0, 0.0])).await.unwrap();
        assert_eq!(store.dimension().await, Some(3));
    }

    #[tokio::test]
    async fn concurrent_appends_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = TermStore::open(dir.path().join("terms.json")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(record(&format!("r{}", i), &[i as f32, 1.0])).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await, 8);
    }
}
