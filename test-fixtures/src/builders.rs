//! Hit builders.

use serde_json::json;

use tributary_core::models::{BackendHit, Modality, RetrievedHit};

/// Metadata object with a single `title` field.
pub fn metadata(title: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    map.insert("title".to_string(), json!(title));
    map
}

/// A backend row with content derived from the ids.
pub fn backend_hit(document_id: &str, chunk_id: Option<&str>, score: f64) -> BackendHit {
    BackendHit {
        document_id: document_id.to_string(),
        chunk_id: chunk_id.map(str::to_string),
        content: format!("content of {document_id}"),
        metadata: metadata(document_id),
        native_score: score,
    }
}

/// A first-stage hit for `modality`.
pub fn hit(document_id: &str, modality: Modality, score: f64) -> RetrievedHit {
    RetrievedHit::from_backend(backend_hit(document_id, None, score), modality)
}

/// Hits for `modality` in the given order, with descending native scores.
pub fn hits(modality: Modality, document_ids: &[&str]) -> Vec<RetrievedHit> {
    let n = document_ids.len() as f64;
    document_ids
        .iter()
        .enumerate()
        .map(|(i, id)| hit(id, modality, n - i as f64))
        .collect()
}
