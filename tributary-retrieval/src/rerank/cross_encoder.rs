use std::sync::Arc;
use std::time::Duration;

use tributary_core::errors::{RerankError, TributaryError, TributaryResult};
use tributary_core::models::{HitSource, RetrievedHit, ScoreKind};
use tributary_core::traits::ICrossEncoder;
use tributary_observability::events;

use super::order_by_scores;

const STAGE: &str = "cross_encoder";

/// Stage A: pairwise cross-encoder scoring in one batch.
pub struct CrossEncoderStage {
    encoder: Option<Arc<dyn ICrossEncoder>>,
    timeout: Duration,
}

impl CrossEncoderStage {
    pub fn new(encoder: Option<Arc<dyn ICrossEncoder>>, timeout: Duration) -> Self {
        Self { encoder, timeout }
    }

    /// Score and sort `hits`, keeping `top_k`. Without a model, or on any
    /// failure, the input order is kept and truncated.
    pub async fn rerank(&self, query: &str, mut hits: Vec<RetrievedHit>, top_k: usize) -> Vec<RetrievedHit> {
        let Some(encoder) = self.encoder.as_deref() else {
            hits.truncate(top_k);
            return hits;
        };
        if hits.is_empty() || top_k == 0 {
            hits.truncate(top_k);
            return hits;
        }

        let scores = match self.score(encoder, query, &hits).await {
            Ok(scores) => scores,
            Err(e) => {
                events::stage_fell_back(STAGE, &e);
                hits.truncate(top_k);
                return hits;
            }
        };

        let mut reranked: Vec<RetrievedHit> = order_by_scores(hits, scores)
            .into_iter()
            .map(|(hit, score)| hit.restaged(HitSource::Rerank, ScoreKind::CrossEncoder, score))
            .collect();
        reranked.truncate(top_k);
        reranked
    }

    async fn score(&self, encoder: &dyn ICrossEncoder, query: &str, hits: &[RetrievedHit]) -> TributaryResult<Vec<f64>> {
        let passages: Vec<String> = hits.iter().map(|h| h.content.clone()).collect();
        let scores = tokio::time::timeout(self.timeout, encoder.score(query, &passages))
            .await
            .map_err(|_| TributaryError::timeout(encoder.name(), self.timeout))??;

        if scores.len() != hits.len() {
            return Err(RerankError::ScoreCountMismatch {
                expected: hits.len(),
                actual: scores.len(),
            }
            .into());
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(RerankError::InvalidScores {
                reason: "non-finite cross-encoder score".to_string(),
            }
            .into());
        }
        Ok(scores.into_iter().map(f64::from).collect())
    }
}
