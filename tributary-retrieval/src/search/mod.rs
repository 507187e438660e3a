//! Modality searchers and the Elasticsearch backend client.
//!
//! Searchers never fail: a backend error or timeout is logged and yields
//! an empty list. An unconfigured backend yields an empty list silently.

mod dense_knn;
mod elastic;
mod lexical;
mod vector_db;

pub use dense_knn::DenseKnnSearcher;
pub use elastic::ElasticClient;
pub use lexical::LexicalSearcher;
pub use vector_db::VectorDbSearcher;

use std::future::Future;
use std::time::Duration;

use tributary_core::errors::{TributaryError, TributaryResult};
use tributary_core::models::{BackendHit, Modality, RetrievedHit};

/// Run a backend call under `limit`, folding the elapsed case into an error.
pub(crate) async fn bounded<F, T>(component: &str, limit: Duration, call: F) -> TributaryResult<T>
where
    F: Future<Output = TributaryResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| TributaryError::timeout(component, limit))?
}

/// Wrap backend rows as hits, best first by native score, at most `k`.
pub(crate) fn into_hits(rows: Vec<BackendHit>, modality: Modality, k: usize) -> Vec<RetrievedHit> {
    let mut hits: Vec<RetrievedHit> = rows
        .into_iter()
        .map(|row| RetrievedHit::from_backend(row, modality))
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(k);
    hits
}
