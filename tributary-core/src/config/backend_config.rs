use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Search backend locations. An absent backend disables its modality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Elasticsearch base URL (vector index + primary lexical backend).
    pub elasticsearch_url: Option<String>,
    pub elasticsearch_index: String,
    pub elasticsearch_timeout_ms: u64,
    /// SQLite database file (relational vector search, full-text fallback,
    /// persistent embedding cache). `":memory:"` opens an in-memory store.
    pub database_path: Option<String>,
}

impl BackendConfig {
    pub fn elasticsearch_timeout(&self) -> Duration {
        Duration::from_millis(self.elasticsearch_timeout_ms)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            elasticsearch_url: None,
            elasticsearch_index: defaults::DEFAULT_ELASTICSEARCH_INDEX.to_string(),
            elasticsearch_timeout_ms: defaults::DEFAULT_ELASTICSEARCH_TIMEOUT_MS,
            database_path: None,
        }
    }
}
