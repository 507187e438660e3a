use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tributary_core::config::RetrievalConfig;
use tributary_core::errors::TributaryResult;
use tributary_core::models::{BackendHit, KnnRequest, Modality, RetrievedHit};
use tributary_core::traits::{IEmbeddingProvider, IModalitySearcher, IVectorIndex};
use tributary_observability::events;

use super::{bounded, into_hits};

/// Approximate nearest neighbours in the external vector index.
///
/// The query is embedded (through the cache when one is supplied), then
/// sent as a cosine KNN request with an oversampled candidate pool.
pub struct DenseKnnSearcher {
    index: Option<Arc<dyn IVectorIndex>>,
    embedder: Arc<dyn IEmbeddingProvider>,
    oversample_factor: usize,
    min_candidates: usize,
    timeout: Duration,
}

impl DenseKnnSearcher {
    pub fn new(
        index: Option<Arc<dyn IVectorIndex>>,
        embedder: Arc<dyn IEmbeddingProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            oversample_factor: config.knn_oversample_factor,
            min_candidates: config.knn_min_candidates,
            timeout: config.search_timeout(),
        }
    }

    async fn query(&self, index: &dyn IVectorIndex, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
        let vector = self.embedder.embed(query).await?;
        let request = KnnRequest::cosine(vector, k, self.oversample_factor, self.min_candidates);
        index.knn(request).await
    }
}

#[async_trait]
impl IModalitySearcher for DenseKnnSearcher {
    fn modality(&self) -> Modality {
        Modality::Dense
    }

    async fn search(&self, query: &str, k: usize) -> Vec<RetrievedHit> {
        let Some(index) = self.index.as_deref() else {
            debug!("no vector index configured, dense search skipped");
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        match bounded("dense search", self.timeout, self.query(index, query, k)).await {
            Ok(rows) => {
                let hits = into_hits(rows, Modality::Dense, k);
                debug!(hits = hits.len(), "dense search complete");
                hits
            }
            Err(e) => {
                events::searcher_failed(Modality::Dense, "vector-index", &e);
                Vec::new()
            }
        }
    }
}
