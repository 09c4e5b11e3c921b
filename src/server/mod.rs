//! HTTP server.
//!
//! A thin axum layer over the services: routing, request/response
//! shapes, and error mapping live here; all behavior lives below.

mod routes;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::{IngestService, SearchService};
use crate::storage::TermStore;

/// Uploads above this size are rejected before parsing.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state handed to every request handler.
///
/// Services are injected rather than reached through globals, so tests
/// can assemble a state around mocks.
#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline.
    pub ingest: IngestService,
    /// Similarity search.
    pub search: SearchService,
    /// Record store, for plain listings.
    pub store: TermStore,
}

/// Builds the router with all routes and middleware.
///
/// CORS is permissive: the API serves a browser frontend hosted on a
/// different origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/terms", post(routes::create_term))
        .route("/terms", get(routes::list_terms))
        .route("/terms/batch", post(routes::create_terms_batch))
        .route("/search", post(routes::search_terms))
        .route("/upload", post(routes::upload_file))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Binds the listener and serves until the process exits.
pub async fn serve(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
