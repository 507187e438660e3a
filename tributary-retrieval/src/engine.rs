//! RetrievalEngine: concurrent modality search, weighted RRF, two-stage rerank.
//!
//! Stage 1: candidate gathering (dense KNN + vector-db + lexical, joined)
//! Stage 2: fusion (availability-weighted RRF, 2 × k candidates)
//! Stage 3: reranking (cross-encoder → optional LLM)

use std::sync::Arc;

use tracing::{debug, info, Instrument};

use tributary_core::config::{RerankConfig, RetrievalConfig};
use tributary_core::models::{Modality, RetrievedHit};
use tributary_core::traits::IModalitySearcher;
use tributary_observability::retrieval_span;

use crate::fusion::{fuse, ModalityHits};
use crate::rerank::Reranker;

/// The retrieval half of the pipeline, from query text to final documents.
pub struct RetrievalEngine {
    dense: Arc<dyn IModalitySearcher>,
    vector_db: Arc<dyn IModalitySearcher>,
    lexical: Arc<dyn IModalitySearcher>,
    reranker: Reranker,
    config: RetrievalConfig,
    rerank: RerankConfig,
}

impl RetrievalEngine {
    pub fn new(
        dense: Arc<dyn IModalitySearcher>,
        vector_db: Arc<dyn IModalitySearcher>,
        lexical: Arc<dyn IModalitySearcher>,
        reranker: Reranker,
        config: RetrievalConfig,
        rerank: RerankConfig,
    ) -> Self {
        Self {
            dense,
            vector_db,
            lexical,
            reranker,
            config,
            rerank,
        }
    }

    /// `k` for a request; zero means the configured default.
    pub fn effective_k(&self, k: usize) -> usize {
        if k == 0 {
            self.config.default_k
        } else {
            k
        }
    }

    /// Run all three searchers concurrently with the same `k`.
    ///
    /// Lists come back in fusion order (dense, vector-db, lexical), each
    /// labelled by the slot it was queried through.
    pub async fn search_all(&self, query: &str, k: usize) -> Vec<ModalityHits> {
        let (dense, vector_db, lexical) = tokio::join!(
            self.dense.search(query, k),
            self.vector_db.search(query, k),
            self.lexical.search(query, k),
        );

        let lists = vec![
            ModalityHits::new(Modality::Dense, dense),
            ModalityHits::new(Modality::VectorDb, vector_db),
            ModalityHits::new(Modality::Lexical, lexical),
        ];
        for list in &lists {
            debug!(modality = %list.modality, hits = list.hits.len(), "searcher returned");
        }
        lists
    }

    /// Search, fuse and rerank. Never fails; a fully degraded pipeline
    /// returns an empty list.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<RetrievedHit> {
        let k = self.effective_k(k);
        async {
            let lists = self.search_all(query, k).await;

            let fused = fuse(&lists, &self.config.weights, self.config.rrf_k, k);
            if fused.is_empty() {
                debug!("no candidates found");
                return Vec::new();
            }
            debug!(candidates = fused.len(), "fusion complete");

            let reranked = self
                .reranker
                .rerank(query, fused, self.rerank.rerank_top_k, self.rerank.final_top_k)
                .await;

            info!(documents = reranked.len(), "retrieval complete");
            reranked
        }
        .instrument(retrieval_span!(k))
        .await
    }
}
