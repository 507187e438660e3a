//! Local cross-encoder via fastembed's `TextRerank`.
//!
//! Inference is CPU-bound and synchronous, so it runs on the blocking pool
//! with the model behind a mutex.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{RerankInitOptions, RerankerModel, TextRerank};

use tributary_core::errors::{RerankError, TributaryResult};
use tributary_core::traits::ICrossEncoder;

pub struct FastEmbedCrossEncoder {
    model: Arc<Mutex<TextRerank>>,
    name: String,
}

impl FastEmbedCrossEncoder {
    /// Load (downloading on first use) the BGE reranker base model.
    pub fn try_new() -> TributaryResult<Self> {
        Self::with_model(RerankerModel::BGERerankerBase)
    }

    pub fn with_model(model: RerankerModel) -> TributaryResult<Self> {
        let name = format!("{model:?}");
        let model = TextRerank::try_new(RerankInitOptions::new(model)).map_err(|e| {
            RerankError::CrossEncoderFailed {
                reason: format!("model load failed: {e}"),
            }
        })?;
        tracing::info!(model = %name, "cross-encoder loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            name,
        })
    }
}

#[async_trait]
impl ICrossEncoder for FastEmbedCrossEncoder {
    async fn score(&self, query: &str, passages: &[String]) -> TributaryResult<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let query = query.to_string();
        let passages = passages.to_vec();
        let expected = passages.len();

        let results = tokio::task::spawn_blocking(move || {
            let mut model = model.lock().map_err(|_| RerankError::CrossEncoderFailed {
                reason: "model lock poisoned".to_string(),
            })?;
            let documents: Vec<&str> = passages.iter().map(String::as_str).collect();
            model
                .rerank(query.as_str(), documents, false, None)
                .map_err(|e| RerankError::CrossEncoderFailed {
                    reason: e.to_string(),
                })
        })
        .await
        .map_err(|e| RerankError::CrossEncoderFailed {
            reason: format!("inference task failed: {e}"),
        })??;

        // Results come back sorted by score; restore input order.
        let mut scores: Vec<Option<f32>> = vec![None; expected];
        for result in results {
            if let Some(slot) = scores.get_mut(result.index) {
                *slot = Some(result.score);
            }
        }
        let scores: Vec<f32> = scores.into_iter().flatten().collect();
        if scores.len() != expected {
            return Err(RerankError::ScoreCountMismatch {
                expected,
                actual: scores.len(),
            }
            .into());
        }
        Ok(scores)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
