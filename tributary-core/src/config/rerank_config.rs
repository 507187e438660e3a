use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Two-stage reranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    /// Stage A (cross-encoder) output size.
    pub rerank_top_k: usize,
    /// Stage B (LLM) output size; the final document count.
    pub final_top_k: usize,
    pub cross_encoder_timeout_ms: u64,
    /// Run the LLM stage when a completion client is available.
    pub llm_enabled: bool,
    pub llm_timeout_ms: u64,
    /// Passage truncation for the LLM prompt.
    pub passage_max_chars: usize,
}

impl RerankConfig {
    pub fn cross_encoder_timeout(&self) -> Duration {
        Duration::from_millis(self.cross_encoder_timeout_ms)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            rerank_top_k: defaults::DEFAULT_RERANK_TOP_K,
            final_top_k: defaults::DEFAULT_FINAL_TOP_K,
            cross_encoder_timeout_ms: defaults::DEFAULT_CROSS_ENCODER_TIMEOUT_MS,
            llm_enabled: defaults::DEFAULT_LLM_RERANK_ENABLED,
            llm_timeout_ms: defaults::DEFAULT_LLM_RERANK_TIMEOUT_MS,
            passage_max_chars: constants::LLM_RERANK_PASSAGE_CHARS,
        }
    }
}
