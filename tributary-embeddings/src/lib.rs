//! # tributary-embeddings
//!
//! Content-addressed embedding cache. Text is hashed with blake3; a hit in
//! the in-memory L1 tier or the persistent store skips the model, a miss
//! computes once and writes through.
//!
//! Providers: OpenAI-compatible HTTP API with retry, and a deterministic
//! feature-hashing fallback that needs nothing external.

pub mod cache;
pub mod codec;
pub mod providers;
pub mod store;

pub use cache::{CacheStats, EmbeddingCache};
pub use providers::{create_provider, ApiProvider, HashingFallback};
pub use store::InMemoryEmbeddingStore;

/// blake3 hex digest of the raw text.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
