/// Reranking errors. Both rerank stages fail open on these.
#[derive(Debug, thiserror::Error)]
pub enum RerankError {
    #[error("cross-encoder failed: {reason}")]
    CrossEncoderFailed { reason: String },

    #[error("score count mismatch: expected {expected}, got {actual}")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error("invalid score response: {reason}")]
    InvalidScores { reason: String },
}
