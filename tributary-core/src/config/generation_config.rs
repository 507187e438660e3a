use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Chat-completion API configuration, shared by answer generation and the
/// LLM rerank stage. Without an `api_key` both features are disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Model used to answer questions.
    pub model: String,
    /// Model used for LLM reranking.
    pub rerank_model: String,
    pub timeout_ms: u64,
    /// Generate answers (otherwise only context is returned).
    pub answer_enabled: bool,
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whether an API key is present and non-blank.
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::DEFAULT_COMPLETION_BASE_URL.to_string(),
            model: defaults::DEFAULT_COMPLETION_MODEL.to_string(),
            rerank_model: defaults::DEFAULT_RERANK_MODEL.to_string(),
            timeout_ms: defaults::DEFAULT_GENERATION_TIMEOUT_MS,
            answer_enabled: defaults::DEFAULT_ANSWER_ENABLED,
        }
    }
}
