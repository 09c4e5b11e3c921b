//! Application settings types.
//!
//! Settings are persisted as JSON under the platform config directory
//! and loaded at startup. Every field carries a serde default so a
//! partial settings file (or none at all) still yields a working
//! configuration. The API key itself never lives in the file, only
//! the name of the environment variable that holds it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerSettings,
    /// Enrichment service configuration.
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
    /// Durable storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// The `host:port` string the listener binds.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Enrichment service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat model used for structuring.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Embedding model; fixes the store's vector dimensionality.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    crate::providers::ai::DEFAULT_CHAT_MODEL.to_string()
}

fn default_embedding_model() -> String {
    crate::providers::ai::DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Durable storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path of the JSON store file. `None` uses the platform data dir.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}
