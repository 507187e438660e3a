//! L1 in-memory cache using moka.
//!
//! TinyLFU admission, bounded entry count, one hour idle TTL. Holds parsed
//! vectors so a hit skips both the store and the text codec.

use std::time::Duration;

use moka::sync::Cache;

/// L1 in-memory embedding cache keyed by blake3 content hash.
pub struct L1MemoryCache {
    cache: Cache<String, Vec<f32>>,
}

impl L1MemoryCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();

        Self { cache }
    }

    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        self.cache.get(content_hash)
    }

    pub fn insert(&self, content_hash: String, embedding: Vec<f32>) {
        self.cache.insert(content_hash, embedding);
    }
}
