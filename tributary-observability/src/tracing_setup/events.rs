//! Structured log events for the pipeline's degradation paths.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use tributary_core::models::Modality;

/// A modality searcher's backend failed or timed out; it contributes no hits.
pub fn searcher_failed(modality: Modality, backend: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "searcher_failed",
        modality = %modality,
        backend = %backend,
        error = %error,
        "searcher failed, returning no hits"
    );
}

/// A primary backend failed and a secondary one is being used instead.
pub fn backend_fell_back(modality: Modality, primary: &str, fallback: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "backend_fell_back",
        modality = %modality,
        primary = %primary,
        fallback = %fallback,
        error = %error,
        "primary backend failed, using fallback"
    );
}

/// A rerank or generation stage failed and its input passed through.
pub fn stage_fell_back(stage: &str, reason: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "stage_fell_back",
        stage = %stage,
        reason = %reason,
        "stage failed, keeping previous ranking"
    );
}

/// A persisted embedding could not be used and will be recomputed.
pub fn cache_corrupt(content_hash: &str, reason: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "cache_corrupt",
        content_hash = %content_hash,
        reason = %reason,
        "corrupt embedding cache entry, recomputing"
    );
}

/// The embedding store failed; the request continues without it.
pub fn cache_store_failed(operation: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(
        event = "cache_store_failed",
        operation = %operation,
        error = %error,
        "embedding store unavailable"
    );
}

/// One `answer` call finished.
pub fn answer_completed(request_id: &str, context_docs: usize, answered: bool, elapsed_ms: u64) {
    tracing::info!(
        event = "answer_completed",
        request_id = %request_id,
        context_docs,
        answered,
        elapsed_ms,
        "answer completed"
    );
}
