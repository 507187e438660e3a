use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;
use crate::models::Modality;

/// Base fusion weight per modality, before availability renormalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub dense: f64,
    pub vector_db: f64,
    pub lexical: f64,
}

impl FusionWeights {
    pub fn new(dense: f64, vector_db: f64, lexical: f64) -> Self {
        Self {
            dense,
            vector_db,
            lexical,
        }
    }

    /// Weight assigned to `modality`.
    pub fn get(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Dense => self.dense,
            Modality::VectorDb => self.vector_db,
            Modality::Lexical => self.lexical,
        }
    }

    pub fn set(&mut self, modality: Modality, weight: f64) {
        match modality {
            Modality::Dense => self.dense = weight,
            Modality::VectorDb => self.vector_db = weight,
            Modality::Lexical => self.lexical = weight,
        }
    }

    pub fn total(&self) -> f64 {
        self.dense + self.vector_db + self.lexical
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            dense: defaults::DEFAULT_WEIGHT_DENSE,
            vector_db: defaults::DEFAULT_WEIGHT_VECTOR_DB,
            lexical: defaults::DEFAULT_WEIGHT_LEXICAL,
        }
    }
}

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Hits requested from each searcher when the caller passes k = 0.
    pub default_k: usize,
    /// RRF k-value for rank fusion.
    pub rrf_k: u32,
    /// Base modality weights.
    pub weights: FusionWeights,
    /// Dense-KNN candidate pool = max(k * factor, floor).
    pub knn_oversample_factor: usize,
    pub knn_min_candidates: usize,
    /// Per-searcher timeout.
    pub search_timeout_ms: u64,
}

impl RetrievalConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: defaults::DEFAULT_K,
            rrf_k: defaults::DEFAULT_RRF_K,
            weights: FusionWeights::default(),
            knn_oversample_factor: constants::KNN_OVERSAMPLE_FACTOR,
            knn_min_candidates: constants::KNN_MIN_CANDIDATE_POOL,
            search_timeout_ms: defaults::DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }
}
