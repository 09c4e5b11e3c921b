//! Business services layer.
//!
//! Services sit between the HTTP layer and the infrastructure:
//!
//! ```text
//! HTTP layer (server)
//!       |
//!       v
//! Services layer  <-- You are here
//!       |
//!       v
//! Infrastructure (providers, storage)
//! ```
//!
//! - [`IngestService`]: text blocks → enrichment → store append
//! - [`SearchService`]: query text → embedding → top-K over the store

mod ingest_service;
mod search_service;

pub use ingest_service::{BatchOutcome, IngestError, IngestResult, IngestService};
pub use search_service::{SearchError, SearchResult, SearchService};
