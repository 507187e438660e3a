//! OpenAI-compatible HTTP embedding provider.
//!
//! Retries transport errors, 429 and 5xx with exponential backoff
//! (100ms, 200ms, 400ms, ...). Other 4xx responses fail immediately.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tributary_core::errors::{EmbeddingError, TributaryResult};
use tributary_core::traits::IEmbeddingProvider;

pub struct ApiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

enum Attempt {
    Retry(EmbeddingError),
    Fatal(EmbeddingError),
}

impl ApiProvider {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        model: String,
        dimensions: usize,
        max_retries: u32,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
            dimensions,
            max_retries,
        }
    }

    async fn send_once(&self, text: &str) -> Result<Vec<f32>, Attempt> {
        let body = EmbedRequest {
            model: &self.model,
            input: [text],
            dimensions: self.dimensions,
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            Attempt::Retry(EmbeddingError::InferenceFailed {
                reason: format!("HTTP error: {e}"),
            })
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = EmbeddingError::InferenceFailed {
                reason: format!("API returned {status}: {body}"),
            };
            return Err(if status.is_server_error() || status.as_u16() == 429 {
                Attempt::Retry(err)
            } else {
                Attempt::Fatal(err)
            });
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            Attempt::Fatal(EmbeddingError::InferenceFailed {
                reason: format!("JSON parse error: {e}"),
            })
        })?;

        let mut embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                Attempt::Fatal(EmbeddingError::InferenceFailed {
                    reason: "empty response".to_string(),
                })
            })?;
        embedding.resize(self.dimensions, 0.0);
        Ok(embedding)
    }
}

#[async_trait]
impl IEmbeddingProvider for ApiProvider {
    async fn embed(&self, text: &str) -> TributaryResult<Vec<f32>> {
        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!(attempt, "retrying API embedding request");
            }

            match self.send_once(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(Attempt::Fatal(e)) => return Err(e.into()),
                Err(Attempt::Retry(e)) => {
                    warn!(attempt, error = %e, "API embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| EmbeddingError::ProviderUnavailable {
                provider: self.model.clone(),
            })
            .into())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}
