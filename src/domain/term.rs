//! Term record types.
//!
//! A [`TermRecord`] is one structured glossary entry together with its
//! embedding vector. Records are created by the ingestion pipeline and
//! never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::TermId;
use crate::embedding::Embedding;

/// The structured fields extracted from a raw text block.
///
/// This is the shape the enrichment service is asked to produce. Every
/// field defaults to the empty string so a partial response yields a
/// usable (if sparse) record instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFields {
    /// Subject area the term belongs to (e.g. "civil engineering").
    #[serde(default)]
    pub category: String,
    /// The term itself.
    #[serde(default)]
    pub term: String,
    /// Definition of the term.
    #[serde(default)]
    pub definition: String,
    /// Usage example, often empty.
    #[serde(default)]
    pub example: String,
}

impl TermFields {
    /// Canonical string used for embedding generation.
    ///
    /// Search quality should depend on the extracted meaning, not on the
    /// raw surface text, so the embedding is computed over term plus
    /// definition.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.term, self.definition)
    }
}

/// One structured term entry with its associated embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Unique identifier, assigned at ingestion.
    pub id: TermId,
    /// Subject area the term belongs to.
    pub category: String,
    /// The term itself.
    pub term: String,
    /// Definition of the term.
    pub definition: String,
    /// Usage example, often empty.
    pub example: String,
    /// Semantic embedding of the term and definition.
    pub embedding: Embedding,
    /// When the record was ingested.
    pub created_at: DateTime<Utc>,
}

impl TermRecord {
    /// Creates a record from extracted fields and their embedding.
    pub fn new(id: TermId, fields: TermFields, embedding: Embedding) -> Self {
        Self {
            id,
            category: fields.category,
            term: fields.term,
            definition: fields.definition,
            example: fields.example,
            embedding,
            created_at: Utc::now(),
        }
    }
}

/// A search result: a record and its similarity score for the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// The matching record.
    pub record: TermRecord,
    /// Cosine similarity against the query embedding.
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TermFields {
        TermFields {
            category: "civil engineering".to_string(),
            term: "bridge".to_string(),
            definition: "a structure spanning an obstacle".to_string(),
            example: String::new(),
        }
    }

    #[test]
    fn embedding_text_combines_term_and_definition() {
        assert_eq!(
            fields().embedding_text(),
            "bridge a structure spanning an obstacle"
        );
    }

    #[test]
    fn fields_default_to_empty_strings() {
        let parsed: TermFields = serde_json::from_str(r#"{"term": "bridge"}"#).unwrap();
        assert_eq!(parsed.term, "bridge");
        assert_eq!(parsed.category, "");
        assert_eq!(parsed.definition, "");
        assert_eq!(parsed.example, "");
    }

    #[test]
    fn record_carries_fields() {
        let record = TermRecord::new(
            TermId::from("id-1"),
            fields(),
            Embedding::new(vec![1.0, 0.0]),
        );

        assert_eq!(record.term, "bridge");
        assert_eq!(record.category, "civil engineering");
        assert_eq!(record.embedding.dimension(), 2);
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = TermRecord::new(
            TermId::from("id-1"),
            fields(),
            Embedding::new(vec![0.5, -0.5, 0.25]),
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: TermRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, record);
    }
}
