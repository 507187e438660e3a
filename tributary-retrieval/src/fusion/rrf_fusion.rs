//! Weighted Reciprocal Rank Fusion: score = Σ w_m / (k + rank_m)
//!
//! Ranks are 1-based positions within each modality's list. A key seen
//! twice in one list keeps its best rank. Output is sorted by fused score
//! descending, ties broken by the `"document_id:chunk_id"` key ascending,
//! and capped at `2 * top_k` to leave the rerankers room to reorder.

use std::collections::{HashMap, HashSet};

use tributary_core::config::FusionWeights;
use tributary_core::models::{HitKey, HitSource, Modality, Provenance, RetrievedHit, ScoreKind};

use super::availability_weights;

/// One searcher's output.
#[derive(Debug, Clone)]
pub struct ModalityHits {
    pub modality: Modality,
    pub hits: Vec<RetrievedHit>,
}

impl ModalityHits {
    pub fn new(modality: Modality, hits: Vec<RetrievedHit>) -> Self {
        Self { modality, hits }
    }
}

struct Candidate<'a> {
    /// First-seen originating hit; supplies content and metadata.
    origin: &'a RetrievedHit,
    provenance: Provenance,
    score: f64,
}

/// Fuse per-modality rankings into one list of at most `2 * top_k` hits.
///
/// `base` weights are adjusted for availability first, so an empty
/// modality contributes nothing.
pub fn fuse(lists: &[ModalityHits], base: &FusionWeights, rrf_k: u32, top_k: usize) -> Vec<RetrievedHit> {
    let weights = availability_weights(base, lists);
    let k = rrf_k as f64;

    let mut candidates: HashMap<HitKey, Candidate<'_>> = HashMap::new();
    for list in lists {
        let weight = weights.get(list.modality);
        let mut seen: HashSet<HitKey> = HashSet::new();
        for (position, hit) in list.hits.iter().enumerate() {
            let key = hit.key();
            if !seen.insert(key.clone()) {
                continue;
            }
            let contribution = weight / (k + (position + 1) as f64);
            let candidate = candidates.entry(key).or_insert_with(|| Candidate {
                origin: hit,
                provenance: Provenance::default(),
                score: 0.0,
            });
            candidate.score += contribution;
            candidate.provenance.absorb(&hit.provenance);
        }
    }

    let mut ranked: Vec<(HitKey, String, Candidate<'_>)> = candidates
        .into_iter()
        .map(|(key, candidate)| {
            let label = key.to_string();
            (key, label, candidate)
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.2.score
            .total_cmp(&a.2.score)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(top_k.saturating_mul(2));

    ranked
        .into_iter()
        .map(|(_, _, candidate)| {
            let mut provenance = candidate.provenance;
            provenance.push(HitSource::Fusion);
            provenance.record(ScoreKind::Fused, candidate.score);
            RetrievedHit {
                document_id: candidate.origin.document_id.clone(),
                chunk_id: candidate.origin.chunk_id.clone(),
                score: candidate.score,
                content: candidate.origin.content.clone(),
                metadata: candidate.origin.metadata.clone(),
                provenance,
                source: HitSource::Fusion,
            }
        })
        .collect()
}
