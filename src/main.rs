//! termbase - entry point for the term knowledge-base server

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use termbase::config;
use termbase::providers::ai::OpenAiProvider;
use termbase::server::{self, AppState};
use termbase::services::{IngestService, SearchService};
use termbase::storage::TermStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = config::load();

    let api_key = std::env::var(&settings.enrichment.api_key_env).ok();
    if api_key.is_none() {
        tracing::warn!(
            var = %settings.enrichment.api_key_env,
            "API key not set; enrichment calls will fail"
        );
    }

    let provider = Arc::new(
        OpenAiProvider::custom(settings.enrichment.base_url.as_str(), api_key)
            .with_chat_model(settings.enrichment.chat_model.as_str())
            .with_embedding_model(settings.enrichment.embedding_model.as_str())
            .with_timeout(Duration::from_secs(settings.enrichment.timeout_secs)),
    );

    let data_file = settings
        .storage
        .data_file
        .clone()
        .unwrap_or_else(config::default_data_file);
    let store = TermStore::open(&data_file)
        .await
        .context("opening term store")?;

    let state = AppState {
        ingest: IngestService::new(provider.clone(), store.clone()),
        search: SearchService::new(provider, store.clone()),
        store,
    };

    let bind_addr = settings.server.bind_addr();
    tracing::info!(addr = %bind_addr, "starting termbase");
    server::serve(&bind_addr, state).await
}
