use serde::{Deserialize, Serialize};

use super::hit::RetrievedHit;
use super::modality::HitSource;
use super::provenance::Provenance;

/// A final-ranked passage as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// 1-based position, matching the `[Doc N]` label in the prompt.
    pub rank: usize,
    pub content: String,
    pub document_id: String,
    pub chunk_id: Option<String>,
    pub source: HitSource,
    pub score: f64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub provenance: Provenance,
}

impl ContextDocument {
    pub fn from_hit(rank: usize, hit: RetrievedHit) -> Self {
        Self {
            rank,
            content: hit.content,
            document_id: hit.document_id,
            chunk_id: hit.chunk_id,
            source: hit.source,
            score: hit.score,
            metadata: hit.metadata,
            provenance: hit.provenance,
        }
    }

    /// Label used for citation inside the prompt.
    pub fn label(&self) -> String {
        format!("[Doc {}]", self.rank)
    }
}

/// Result of one `answer` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub request_id: String,
    /// Generated text; empty when no generator is configured or it failed.
    pub answer: String,
    pub context: Vec<ContextDocument>,
    /// Document ids in final rank order.
    pub citations: Vec<String>,
    pub session_id: Option<String>,
}
