//! Enrichment provider trait and supporting types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TermFields;
use crate::embedding::Embedding;

/// Errors that can occur talking to the enrichment service.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    #[error("response is not the expected structured JSON: {0}")]
    Structuring(String),

    #[error("rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("authentication failed: {0}")]
    Authentication(String),
}

impl EnrichmentError {
    /// Whether a retry has any chance of succeeding.
    ///
    /// Transport failures, rate limits, and server-side errors are
    /// worth one retry in batch mode; a malformed response body is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::InvalidResponse(_) | Self::Structuring(_) | Self::Authentication(_) => false,
        }
    }
}

/// Result type for enrichment operations.
pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Trait for enrichment services that structure text and embed it.
///
/// Both operations are network calls that may fail with transport
/// errors, non-2xx statuses, or malformed payloads; all of those map
/// onto [`EnrichmentError`] rather than panicking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    /// Returns the provider's name (e.g. "openai").
    fn name(&self) -> &'static str;

    /// Extracts structured term fields from a raw text block.
    async fn structure(&self, text: &str) -> EnrichmentResult<TermFields>;

    /// Generates an embedding vector for the given text.
    async fn embed(&self, text: &str) -> EnrichmentResult<Embedding>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(EnrichmentError::RateLimited {
            retry_after_secs: Some(2)
        }
        .is_retryable());
        assert!(EnrichmentError::Api {
            status: 503,
            message: "overloaded".into()
        }
        .is_retryable());
    }

    #[test]
    fn structuring_errors_are_not_retryable() {
        assert!(!EnrichmentError::Structuring("not json".into()).is_retryable());
        assert!(!EnrichmentError::InvalidResponse("no choices".into()).is_retryable());
        assert!(!EnrichmentError::Authentication("bad key".into()).is_retryable());
        assert!(!EnrichmentError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_retryable());
    }
}
