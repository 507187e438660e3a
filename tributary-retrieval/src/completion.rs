//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tributary_core::config::GenerationConfig;
use tributary_core::errors::{GenerationError, TributaryResult};
use tributary_core::traits::{CompletionRequest, ITextCompletion};

pub struct ChatCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    default_model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            default_model: default_model.into(),
        }
    }

    /// Client for the configured API, or `None` without an API key.
    pub fn from_config(config: &GenerationConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let key = config.api_key.as_deref()?.trim();
        Some(Self::new(&config.base_url, key, config.model.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user,
        });
        ChatRequest {
            model: request.model.as_deref().unwrap_or(&self.default_model),
            messages,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl ITextCompletion for ChatCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> TributaryResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.body(&request))
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::BadStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| GenerationError::RequestFailed {
            reason: format!("JSON parse error: {e}"),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse.into())
    }
}
