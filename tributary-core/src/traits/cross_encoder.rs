use async_trait::async_trait;

use crate::errors::TributaryResult;

/// Pairwise relevance model.
#[async_trait]
pub trait ICrossEncoder: Send + Sync {
    /// Score `(query, passage)` for every passage, in input order.
    async fn score(&self, query: &str, passages: &[String]) -> TributaryResult<Vec<f32>>;

    fn name(&self) -> &str;
}
