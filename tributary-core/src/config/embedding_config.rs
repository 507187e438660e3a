use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "api" or "hashing".
    pub provider: String,
    /// Model name sent to the embedding API.
    pub model: String,
    /// Embeddings endpoint (OpenAI-compatible). Required for "api".
    pub api_url: Option<String>,
    /// Bearer token for the embedding API.
    pub api_key: Option<String>,
    /// Embedding dimensions.
    pub dimensions: usize,
    /// Characters of source text stored next to a cached vector.
    pub preview_chars: usize,
    /// L1 in-memory cache max entries. 0 disables the tier.
    pub l1_cache_size: u64,
    /// Per-call timeout for the embedding model.
    pub timeout_ms: u64,
    /// Retries for the HTTP provider.
    pub max_retries: u32,
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_url: None,
            api_key: None,
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            preview_chars: constants::CONTENT_PREVIEW_CHARS,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_EMBEDDING_MAX_RETRIES,
        }
    }
}
