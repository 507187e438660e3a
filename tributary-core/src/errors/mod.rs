//! Error taxonomy. One enum per subsystem, aggregated into [`TributaryError`].

mod config_error;
mod embedding_error;
mod generation_error;
mod rerank_error;
mod search_error;
mod storage_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use generation_error::GenerationError;
pub use rerank_error::RerankError;
pub use search_error::SearchError;
pub use storage_error::StorageError;

/// Result alias used across the workspace.
pub type TributaryResult<T> = Result<T, TributaryError>;

/// Top-level error for every Tributary subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TributaryError {
    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("search error: {0}")]
    SearchError(#[from] SearchError),

    #[error("rerank error: {0}")]
    RerankError(#[from] RerankError),

    #[error("generation error: {0}")]
    GenerationError(#[from] GenerationError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("{component} timed out after {elapsed_ms}ms")]
    Timeout { component: String, elapsed_ms: u64 },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl TributaryError {
    /// Build a timeout error for `component`.
    pub fn timeout(component: impl Into<String>, elapsed: std::time::Duration) -> Self {
        Self::Timeout {
            component: component.into(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
