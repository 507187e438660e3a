use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use tributary_core::config::RerankConfig;
use tributary_core::errors::{RerankError, TributaryError, TributaryResult};
use tributary_core::models::{HitSource, RetrievedHit, ScoreKind};
use tributary_core::traits::{CompletionRequest, ITextCompletion};
use tributary_observability::events;

use super::order_by_scores;

const STAGE: &str = "llm_rerank";

/// Instruction sent with every LLM rerank request.
pub const RERANK_SYSTEM_PROMPT: &str = "You are a ranking model. Score relevance between 0 and 1 for each candidate passage to the user query. Respond ONLY with a JSON array of numbers.";

/// Stage B: one completion call returning a JSON array of scores.
pub struct LlmRerankStage {
    completion: Option<Arc<dyn ITextCompletion>>,
    model: Option<String>,
    timeout: Duration,
    passage_max_chars: usize,
}

impl LlmRerankStage {
    pub fn new(
        completion: Option<Arc<dyn ITextCompletion>>,
        model: Option<String>,
        config: &RerankConfig,
    ) -> Self {
        let completion = if config.llm_enabled { completion } else { None };
        Self {
            completion,
            model,
            timeout: config.llm_timeout(),
            passage_max_chars: config.passage_max_chars,
        }
    }

    /// A stage that always passes its input through.
    pub fn disabled() -> Self {
        Self::new(None, None, &RerankConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.completion.is_some()
    }

    pub async fn rerank(&self, query: &str, mut hits: Vec<RetrievedHit>, top_k: usize) -> Vec<RetrievedHit> {
        let Some(completion) = self.completion.as_deref() else {
            hits.truncate(top_k);
            return hits;
        };
        if hits.is_empty() || top_k == 0 {
            hits.truncate(top_k);
            return hits;
        }

        let scores = match self.score(completion, query, &hits).await {
            Ok(scores) => scores,
            Err(e) => {
                events::stage_fell_back(STAGE, &e);
                hits.truncate(top_k);
                return hits;
            }
        };

        let mut reranked: Vec<RetrievedHit> = order_by_scores(hits, scores)
            .into_iter()
            .map(|(hit, score)| hit.restaged(HitSource::Rerank, ScoreKind::LlmRerank, score))
            .collect();
        reranked.truncate(top_k);
        reranked
    }

    /// The completion request for `hits`.
    pub fn build_request(&self, query: &str, hits: &[RetrievedHit]) -> TributaryResult<CompletionRequest> {
        let passages: Vec<String> = hits
            .iter()
            .map(|h| h.content.chars().take(self.passage_max_chars).collect())
            .collect();
        let user = serde_json::to_string(&json!({ "query": query, "passages": passages }))?;
        let mut request = CompletionRequest::new(user)
            .with_system(RERANK_SYSTEM_PROMPT)
            .with_temperature(0.0);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }
        Ok(request)
    }

    async fn score(&self, completion: &dyn ITextCompletion, query: &str, hits: &[RetrievedHit]) -> TributaryResult<Vec<f64>> {
        let request = self.build_request(query, hits)?;
        let reply = tokio::time::timeout(self.timeout, completion.complete(request))
            .await
            .map_err(|_| TributaryError::timeout("llm rerank", self.timeout))??;
        parse_scores(&reply, hits.len())
    }
}

/// Parse a JSON array of `expected` finite numbers, optionally wrapped in a
/// markdown code fence.
pub fn parse_scores(reply: &str, expected: usize) -> TributaryResult<Vec<f64>> {
    let invalid = |reason: String| -> TributaryError { RerankError::InvalidScores { reason }.into() };

    let body = strip_code_fence(reply.trim());
    let value: Value = serde_json::from_str(body).map_err(|e| invalid(format!("not JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(invalid("expected a JSON array".to_string()));
    };

    let scores = items
        .iter()
        .map(|item| {
            item.as_f64()
                .filter(|s| s.is_finite())
                .ok_or_else(|| invalid(format!("not a finite number: {item}")))
        })
        .collect::<TributaryResult<Vec<f64>>>()?;

    if scores.len() != expected {
        return Err(RerankError::ScoreCountMismatch {
            expected,
            actual: scores.len(),
        }
        .into());
    }
    Ok(scores)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
