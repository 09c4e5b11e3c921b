//! Persistence layer.
//!
//! The [`TermStore`] owns the in-memory record collection and keeps it
//! synchronized with a JSON file on disk.

mod term_store;

pub use term_store::{StoreError, StoreResult, TermStore};
