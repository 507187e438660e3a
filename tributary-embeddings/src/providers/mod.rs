//! Embedding providers and the config-driven factory.

mod api_provider;
mod hashing_fallback;

use std::sync::Arc;

use tributary_core::config::EmbeddingConfig;
use tributary_core::traits::IEmbeddingProvider;

pub use api_provider::ApiProvider;
pub use hashing_fallback::HashingFallback;

/// Build the configured provider. An "api" provider without a URL, or an
/// unknown provider name, falls back to feature hashing.
pub fn create_provider(config: &EmbeddingConfig) -> Arc<dyn IEmbeddingProvider> {
    match (config.provider.as_str(), config.api_url.as_deref()) {
        ("api", Some(url)) => {
            tracing::info!(url, model = %config.model, dims = config.dimensions, "using API embedding provider");
            Arc::new(ApiProvider::new(
                url.to_string(),
                config.api_key.clone(),
                config.model.clone(),
                config.dimensions,
                config.max_retries,
            ))
        }
        ("hashing", _) => Arc::new(HashingFallback::new(config.dimensions)),
        (other, _) => {
            tracing::warn!(provider = other, "embedding provider unusable, using feature hashing");
            Arc::new(HashingFallback::new(config.dimensions))
        }
    }
}
