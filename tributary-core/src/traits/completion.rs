use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::TributaryResult;

/// A single text-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    /// Overrides the client's default model.
    pub model: Option<String>,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: 0.0,
            model: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// The one text-completion capability. Used for answer generation and for
/// LLM reranking.
#[async_trait]
pub trait ITextCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> TributaryResult<String>;
}
