use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cache row as persisted: the vector is kept in its delimited text form
/// (`[0.1,0.2,...]`) and parsed by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingCacheRow {
    pub content_hash: String,
    pub content_preview: String,
    pub embedding: String,
    pub usage_count: u64,
    pub last_used: DateTime<Utc>,
}

/// A parsed embedding cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingCacheEntry {
    pub content_hash: String,
    pub content_preview: String,
    pub vector: Vec<f32>,
    pub usage_count: u64,
    pub last_used: DateTime<Utc>,
}
