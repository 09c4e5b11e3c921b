//! API route handlers.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::adapters::{self, AdapterError};
use crate::domain::{SearchHit, TermRecord};
use crate::providers::ai::EnrichmentError;
use crate::services::{BatchOutcome, IngestError, SearchError};

/// A request-level failure, rendered as `{ "error": ... }` with the
/// mapped status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<EnrichmentError> for ApiError {
    fn from(e: EnrichmentError) -> Self {
        let status = match e {
            // A missing or rejected key is our deployment's problem.
            EnrichmentError::Authentication(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::EmptyInput => Self::bad_request(e.to_string()),
            IngestError::Enrichment(e) => e.into(),
            IngestError::Store(e) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            },
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Enrichment(e) => e.into(),
        }
    }
}

impl From<AdapterError> for ApiError {
    fn from(e: AdapterError) -> Self {
        Self::bad_request(e.to_string())
    }
}

/// Body for single-text ingestion.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Raw text to structure into one record.
    pub text: String,
}

/// Body for batch ingestion of pre-split blocks.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// One text block per record candidate.
    pub blocks: Vec<String>,
}

/// Body for similarity search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Query text, embedded before ranking.
    pub query: String,
    /// Number of results; defaults to 5.
    pub k: Option<usize>,
}

/// Health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /terms`: ingest one text, return the created record.
pub async fn create_term(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<TermRecord>, ApiError> {
    let record = state.ingest.ingest(&req.text).await?;
    Ok(Json(record))
}

/// `POST /terms/batch`: ingest many blocks, return the outcome counts.
pub async fn create_terms_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Json<BatchOutcome> {
    Json(state.ingest.ingest_many(&req.blocks).await)
}

/// `GET /terms`: full listing in insertion order.
pub async fn list_terms(State(state): State<AppState>) -> Json<Vec<TermRecord>> {
    Json(state.store.all().await)
}

/// `POST /search`: ranked similarity search.
pub async fn search_terms(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let hits = state.search.search(&req.query, req.k).await?;
    Ok(Json(hits))
}

/// `POST /upload`: multipart file upload, parsed into blocks and
/// batch-ingested.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchOutcome>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {}", e)))?;

        tracing::info!(file = %file_name, bytes = bytes.len(), "processing upload");
        let blocks = adapters::parse(&file_name, &bytes)?;
        return Ok(Json(state.ingest.ingest_many(&blocks).await));
    }

    Err(ApiError::bad_request("no file field in upload"))
}
