use serde::{Deserialize, Serialize};

/// One row/hit as returned by a search backend, before it becomes a
/// [`RetrievedHit`](super::RetrievedHit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendHit {
    pub document_id: String,
    pub chunk_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Similarity, BM25 relevance or full-text rank; higher is better.
    pub native_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    Cosine,
}

impl SimilarityMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
        }
    }
}

/// Nearest-neighbor request sent to the external vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnRequest {
    pub vector: Vec<f32>,
    pub k: usize,
    pub candidate_pool: usize,
    pub metric: SimilarityMetric,
}

impl KnnRequest {
    /// Cosine request for `k` results with an oversampled candidate pool of
    /// `max(k * factor, floor)`.
    pub fn cosine(vector: Vec<f32>, k: usize, factor: usize, floor: usize) -> Self {
        Self {
            vector,
            k,
            candidate_pool: k.saturating_mul(factor).max(floor),
            metric: SimilarityMetric::Cosine,
        }
    }
}
