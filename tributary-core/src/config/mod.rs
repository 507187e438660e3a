//! Layered configuration: one struct per subsystem, defaults in [`defaults`],
//! TOML file on top, environment variables on top of that.

pub mod defaults;

mod backend_config;
mod embedding_config;
mod generation_config;
mod observability_config;
mod rerank_config;
mod retrieval_config;
mod session_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use backend_config::BackendConfig;
pub use embedding_config::EmbeddingConfig;
pub use generation_config::GenerationConfig;
pub use observability_config::ObservabilityConfig;
pub use rerank_config::RerankConfig;
pub use retrieval_config::{FusionWeights, RetrievalConfig};
pub use session_config::SessionConfig;

use crate::errors::{ConfigError, TributaryResult};

/// Aggregate configuration for the whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TributaryConfig {
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub rerank: RerankConfig,
    pub generation: GenerationConfig,
    pub session: SessionConfig,
    pub backends: BackendConfig,
    pub observability: ObservabilityConfig,
}

impl TributaryConfig {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml(source: &str) -> TributaryResult<Self> {
        toml::from_str(source).map_err(|e| {
            ConfigError::ParseFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> TributaryResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&source)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (the environment in
    /// production, a map in tests). Prefixed names win over bare ones.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()))
        };

        if let Some(key) = first(&["TRIBUTARY_OPENAI_API_KEY", "OPENAI_API_KEY"]) {
            self.generation.api_key = Some(key);
        }
        if let Some(url) = first(&["TRIBUTARY_ELASTICSEARCH_URL", "ELASTICSEARCH_URL", "ELASTIC_URL"]) {
            self.backends.elasticsearch_url = Some(url);
        }
        if let Some(index) = first(&["TRIBUTARY_ELASTICSEARCH_INDEX", "ELASTICSEARCH_INDEX"]) {
            self.backends.elasticsearch_index = index;
        }
        if let Some(path) = first(&["TRIBUTARY_DATABASE_PATH"]) {
            self.backends.database_path = Some(path);
        }
        if let Some(url) = first(&["TRIBUTARY_EMBEDDING_API_URL"]) {
            self.embedding.api_url = Some(url);
            self.embedding.provider = "api".to_string();
        }
        if let Some(key) = first(&["TRIBUTARY_EMBEDDING_API_KEY"]) {
            self.embedding.api_key = Some(key);
        }
        if let Some(level) = first(&["TRIBUTARY_LOG"]) {
            self.observability.log_level = level;
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> TributaryResult<()> {
        let invalid = |field: &str, reason: &str| -> TributaryResult<()> {
            Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: reason.to_string(),
            }
            .into())
        };

        let w = &self.retrieval.weights;
        if [w.dense, w.vector_db, w.lexical]
            .iter()
            .any(|x| !x.is_finite() || *x < 0.0)
        {
            return invalid("retrieval.weights", "weights must be finite and non-negative");
        }
        if w.total() <= 0.0 {
            return invalid("retrieval.weights", "weights must sum to a positive value");
        }
        if self.embedding.dimensions == 0 {
            return invalid("embedding.dimensions", "must be greater than zero");
        }
        if self.rerank.rerank_top_k == 0 || self.rerank.final_top_k == 0 {
            return invalid("rerank", "top-k values must be greater than zero");
        }
        if self.rerank.final_top_k > self.rerank.rerank_top_k {
            return invalid("rerank.final_top_k", "must not exceed rerank_top_k");
        }
        if self.embedding.provider == "api" && self.embedding.api_url.is_none() {
            return invalid("embedding.api_url", "required when provider is \"api\"");
        }
        Ok(())
    }
}
