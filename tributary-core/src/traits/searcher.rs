use async_trait::async_trait;

use crate::models::{Modality, RetrievedHit};

/// One retrieval strategy.
///
/// `search` never fails: backend errors are logged by the implementation
/// and surface as an empty list.
#[async_trait]
pub trait IModalitySearcher: Send + Sync {
    fn modality(&self) -> Modality;

    /// Up to `k` hits, best first by the searcher's native score.
    async fn search(&self, query: &str, k: usize) -> Vec<RetrievedHit>;
}
