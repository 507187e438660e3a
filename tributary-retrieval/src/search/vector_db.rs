use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tributary_core::config::RetrievalConfig;
use tributary_core::errors::TributaryResult;
use tributary_core::models::{BackendHit, Modality, RetrievedHit};
use tributary_core::traits::{IEmbeddingProvider, IModalitySearcher, IRelationalStore};
use tributary_observability::events;

use super::{bounded, into_hits};

/// Cosine search over completed chunk embeddings in the relational store.
pub struct VectorDbSearcher {
    store: Option<Arc<dyn IRelationalStore>>,
    embedder: Arc<dyn IEmbeddingProvider>,
    timeout: Duration,
}

impl VectorDbSearcher {
    pub fn new(
        store: Option<Arc<dyn IRelationalStore>>,
        embedder: Arc<dyn IEmbeddingProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            timeout: config.search_timeout(),
        }
    }

    async fn query(&self, store: &dyn IRelationalStore, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
        let vector = self.embedder.embed(query).await?;
        store.vector_search(&vector, k).await
    }
}

#[async_trait]
impl IModalitySearcher for VectorDbSearcher {
    fn modality(&self) -> Modality {
        Modality::VectorDb
    }

    async fn search(&self, query: &str, k: usize) -> Vec<RetrievedHit> {
        let Some(store) = self.store.as_deref() else {
            debug!("no relational store configured, vector-db search skipped");
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        match bounded("vector-db search", self.timeout, self.query(store, query, k)).await {
            Ok(rows) => {
                let hits = into_hits(rows, Modality::VectorDb, k);
                debug!(hits = hits.len(), "vector-db search complete");
                hits
            }
            Err(e) => {
                events::searcher_failed(Modality::VectorDb, "relational", &e);
                Vec::new()
            }
        }
    }
}
