//! Two-stage reranking. Stage A scores `(query, passage)` pairs with a
//! cross-encoder; stage B asks a completion model for relevance scores.
//! Either stage falls back to its input order, truncated.

mod cross_encoder;
#[cfg(feature = "reranker")]
mod fastembed_encoder;
mod llm;

pub use cross_encoder::CrossEncoderStage;
#[cfg(feature = "reranker")]
pub use fastembed_encoder::FastEmbedCrossEncoder;
pub use llm::{parse_scores, LlmRerankStage, RERANK_SYSTEM_PROMPT};

use tracing::debug;

use tributary_core::models::RetrievedHit;

/// Both stages, run in sequence.
pub struct Reranker {
    cross_encoder: CrossEncoderStage,
    llm: LlmRerankStage,
}

impl Reranker {
    pub fn new(cross_encoder: CrossEncoderStage, llm: LlmRerankStage) -> Self {
        Self { cross_encoder, llm }
    }

    /// Stage A down to `rerank_top_k`, then stage B down to `final_top_k`.
    pub async fn rerank(
        &self,
        query: &str,
        fused: Vec<RetrievedHit>,
        rerank_top_k: usize,
        final_top_k: usize,
    ) -> Vec<RetrievedHit> {
        let stage_a = self.cross_encoder.rerank(query, fused, rerank_top_k).await;
        debug!(hits = stage_a.len(), "cross-encoder stage complete");
        let stage_b = self.llm.rerank(query, stage_a, final_top_k).await;
        debug!(hits = stage_b.len(), "llm rerank stage complete");
        stage_b
    }
}

/// Stable descending sort by `scores`, paired index-wise with `hits`.
pub(crate) fn order_by_scores(hits: Vec<RetrievedHit>, scores: Vec<f64>) -> Vec<(RetrievedHit, f64)> {
    let mut paired: Vec<(RetrievedHit, f64)> = hits.into_iter().zip(scores).collect();
    paired.sort_by(|a, b| b.1.total_cmp(&a.1));
    paired
}
