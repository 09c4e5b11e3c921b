//! The embedding vector type.

use serde::{Deserialize, Serialize};

/// A vector embedding representing text semantics.
///
/// The dimensionality is fixed per deployment by the embedding model
/// (1536 for the default OpenAI model). Serializes as a bare JSON array
/// so the persisted store stays a plain array of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding {
    /// The embedding vector.
    pub values: Vec<f32>,
}

impl Embedding {
    /// Creates a new embedding from a vector of values.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Returns the dimensionality of this embedding.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Computes cosine similarity with another embedding.
    ///
    /// Returns `None` when the dimensionalities differ; the caller
    /// decides whether that skips a record or rejects a query. A zero
    /// vector has no direction, so its similarity is `NEG_INFINITY`
    /// (ranks below every real score) instead of NaN.
    pub fn cosine_similarity(&self, other: &Embedding) -> Option<f32> {
        if self.values.len() != other.values.len() {
            return None;
        }

        let dot: f32 = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum();

        let norm_a: f32 = self.values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.values.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Some(f32::NEG_INFINITY);
        }

        Some(dot / (norm_a * norm_b))
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_with_self_is_one() {
        let e = Embedding::new(vec![0.3, -0.7, 0.64]);
        let sim = e.cosine_similarity(&e).unwrap();
        assert!((sim - 1.0).abs() < 1e-5);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = Embedding::new(vec![1.0, 2.0, 3.0]);
        let b = Embedding::new(vec![-0.5, 0.25, 4.0]);
        assert_eq!(a.cosine_similarity(&b), b.cosine_similarity(&a));
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![0.0, 1.0]);
        let sim = a.cosine_similarity(&b).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn dimension_mismatch_is_none() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert_eq!(a.cosine_similarity(&b), None);
    }

    #[test]
    fn zero_vector_scores_negative_infinity() {
        let zero = Embedding::new(vec![0.0, 0.0]);
        let b = Embedding::new(vec![1.0, 0.0]);

        let sim = zero.cosine_similarity(&b).unwrap();
        assert_eq!(sim, f32::NEG_INFINITY);
        assert!(!sim.is_nan());
    }

    #[test]
    fn serializes_as_bare_array() {
        let e = Embedding::new(vec![1.0, 2.0]);
        assert_eq!(serde_json::to_string(&e).unwrap(), "[1.0,2.0]");

        let back: Embedding = serde_json::from_str("[1.0,2.0]").unwrap();
        assert_eq!(back, e);
    }
}
