use std::fmt;

use serde::{Deserialize, Serialize};

use super::backend_hit::BackendHit;
use super::modality::{HitSource, Modality};
use super::provenance::{Provenance, ScoreKind};

/// Identity of a passage across modalities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitKey {
    pub document_id: String,
    pub chunk_id: Option<String>,
}

impl fmt::Display for HitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.document_id,
            self.chunk_id.as_deref().unwrap_or("")
        )
    }
}

/// One candidate passage surfaced by a retrieval or reranking stage.
///
/// `score` is stage-specific and not comparable across stages. `content` and
/// `metadata` never change after retrieval; each stage produces a new hit
/// with one more provenance tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedHit {
    pub document_id: String,
    pub chunk_id: Option<String>,
    pub score: f64,
    pub content: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub provenance: Provenance,
    pub source: HitSource,
}

impl RetrievedHit {
    /// Wrap a backend row as a first-stage hit.
    pub fn from_backend(hit: BackendHit, modality: Modality) -> Self {
        let source = HitSource::from(modality);
        Self {
            document_id: hit.document_id,
            chunk_id: hit.chunk_id,
            score: hit.native_score,
            content: hit.content,
            metadata: hit.metadata,
            provenance: Provenance::origin(modality, hit.native_score),
            source,
        }
    }

    pub fn key(&self) -> HitKey {
        HitKey {
            document_id: self.document_id.clone(),
            chunk_id: self.chunk_id.clone(),
        }
    }

    /// A copy of this hit as produced by a later stage.
    pub fn restaged(&self, source: HitSource, kind: ScoreKind, score: f64) -> Self {
        let mut provenance = self.provenance.clone();
        provenance.push(source);
        provenance.record(kind, score);
        Self {
            document_id: self.document_id.clone(),
            chunk_id: self.chunk_id.clone(),
            score,
            content: self.content.clone(),
            metadata: self.metadata.clone(),
            provenance,
            source,
        }
    }
}
