//! Provenance accreted by a hit as it moves through the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::modality::{HitSource, Modality};

/// Named scores a stage can attach to a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    /// A searcher's own score (similarity, BM25, FTS rank), one per
    /// modality so a shared passage keeps all of them through fusion.
    DenseNative,
    VectorDbNative,
    LexicalNative,
    /// Weighted reciprocal-rank fusion score.
    Fused,
    CrossEncoder,
    LlmRerank,
}

impl ScoreKind {
    pub fn native(modality: Modality) -> Self {
        match modality {
            Modality::Dense => Self::DenseNative,
            Modality::VectorDb => Self::VectorDbNative,
            Modality::Lexical => Self::LexicalNative,
        }
    }
}

/// Ordered stage tags plus named scores. Stages only ever append.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub tags: Vec<HitSource>,
    pub scores: BTreeMap<ScoreKind, f64>,
}

impl Provenance {
    /// Provenance for a freshly retrieved hit.
    pub fn origin(modality: Modality, native_score: f64) -> Self {
        let mut p = Self::default();
        p.push(HitSource::from(modality));
        p.record(ScoreKind::native(modality), native_score);
        p
    }

    /// Append a stage tag.
    pub fn push(&mut self, tag: HitSource) {
        self.tags.push(tag);
    }

    /// Attach a named score. An existing value is kept so earlier stages
    /// are never overwritten.
    pub fn record(&mut self, kind: ScoreKind, score: f64) {
        self.scores.entry(kind).or_insert(score);
    }

    pub fn score(&self, kind: ScoreKind) -> Option<f64> {
        self.scores.get(&kind).copied()
    }

    pub fn passed_through(&self, tag: HitSource) -> bool {
        self.tags.contains(&tag)
    }

    /// Merge another provenance in: tags not yet present are appended in
    /// their order, scores are added where missing.
    pub fn absorb(&mut self, other: &Provenance) {
        for tag in &other.tags {
            if !self.tags.contains(tag) {
                self.tags.push(*tag);
            }
        }
        for (kind, score) in &other.scores {
            self.scores.entry(*kind).or_insert(*score);
        }
    }
}
