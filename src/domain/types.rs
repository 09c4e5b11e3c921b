//! Core identifier types for domain entities.
//!
//! Newtype wrappers provide type safety for entity identifiers and keep
//! the id-generation scheme in one place.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a term record.
///
/// Encodes the creation instant (millisecond precision) plus a random
/// tie-breaker, so that batch ingestion runs creating several records
/// within the same clock tick still get distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermId(pub String);

impl TermId {
    /// Generates a fresh id from the current time and a random suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}", millis, &suffix[..8]))
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TermId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
