//! OpenAI-compatible enrichment provider.
//!
//! Works with OpenAI and any endpoint that speaks the same chat
//! completions and embeddings APIs (vLLM, LM Studio, proxies).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::traits::{EnrichmentError, EnrichmentProvider, EnrichmentResult};
use crate::domain::TermFields;
use crate::embedding::Embedding;

/// Default base URL for OpenAI's API.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model used for structuring.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default embedding model, 1536 dimensions.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Sampling temperature for structuring calls. Low, because we want
/// faithful extraction rather than creativity.
const STRUCTURE_TEMPERATURE: f32 = 0.3;

/// Embedding dimensionality for known OpenAI models.
pub fn embedding_dimension(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
        // Unknown models: assume the common small-model width.
        _ => 1536,
    }
}

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completions response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Embeddings request body.
#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

/// Embeddings response body.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// API error response.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

/// Enrichment provider backed by an OpenAI-compatible API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    embedding_model: String,
}

impl OpenAiProvider {
    /// Creates a provider for OpenAI's API with default models.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::custom(OPENAI_BASE_URL, Some(api_key.into()))
    }

    /// Creates a provider for a custom endpoint.
    pub fn custom(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    /// Overrides the chat model used for structuring.
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Overrides the embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Bounds every request with the given timeout.
    ///
    /// An ingestion unit whose enrichment call times out fails on its
    /// own; it must never stall the whole process.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Dimensionality of the configured embedding model.
    pub fn dimension(&self) -> usize {
        embedding_dimension(&self.embedding_model)
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(ref api_key) = self.api_key {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", api_key)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    fn structure_prompt(text: &str) -> String {
        format!(
            "Extract one glossary entry from the text below. Respond with only a JSON object \
             of the shape {{\"category\": \"\", \"term\": \"\", \"definition\": \"\", \
             \"example\": \"\"}}. Use empty strings for anything the text does not provide.\n\
             Text: \"\"\"{}\"\"\"",
            text
        )
    }

    async fn handle_error_response(&self, response: reqwest::Response) -> EnrichmentError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());

            return EnrichmentError::RateLimited {
                retry_after_secs: retry_after,
            };
        }

        if let Ok(body) = response.json::<ApiErrorBody>().await {
            if status == 401 || body.error.code.as_deref() == Some("invalid_api_key") {
                return EnrichmentError::Authentication(body.error.message);
            }
            return EnrichmentError::Api {
                status,
                message: body.error.message,
            };
        }

        EnrichmentError::Api {
            status,
            message: format!("HTTP {}", status),
        }
    }
}

/// Strips a markdown code fence from around a JSON payload.
///
/// Chat models sometimes wrap the requested JSON in ```json fences even
/// when told not to; the content in between is still usable.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl EnrichmentProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn structure(&self, text: &str) -> EnrichmentResult<TermFields> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: Self::structure_prompt(text),
            }],
            temperature: STRUCTURE_TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            EnrichmentError::InvalidResponse(format!("failed to parse response: {}", e))
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| EnrichmentError::InvalidResponse("no choices in response".into()))?;

        serde_json::from_str(strip_code_fence(&content))
            .map_err(|e| EnrichmentError::Structuring(format!("{}: {}", e, content)))
    }

    async fn embed(&self, text: &str) -> EnrichmentResult<Embedding> {
        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        let api_response: EmbeddingResponse = response.json().await.map_err(|e| {
            EnrichmentError::InvalidResponse(format!("failed to parse response: {}", e))
        })?;

        let datum = api_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EnrichmentError::InvalidResponse("no embedding in response".into()))?;

        Ok(Embedding::new(datum.embedding))
    }
}
