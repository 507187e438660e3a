//! Embedding cache coordinator.
//!
//! Lookup order: L1 (moka, parsed vectors) → persistent store (text rows)
//! → provider. Write-through on miss. Store failures degrade to a miss on
//! read and are logged on write; they never fail the request.
//!
//! Store calls run on tokio's blocking pool so a slow or contended store
//! never stalls a runtime worker.

pub mod l1_memory;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tributary_core::config::EmbeddingConfig;
use tributary_core::errors::{EmbeddingError, StorageError, TributaryError, TributaryResult};
use tributary_core::models::EmbeddingCacheEntry;
use tributary_core::traits::{IEmbeddingProvider, IEmbeddingStore};
use tributary_observability::events;

pub use l1_memory::L1MemoryCache;

use crate::codec::{format_vector, parse_vector};
use crate::content_hash;

/// Counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_hits: u64,
    pub store_hits: u64,
    pub misses: u64,
    pub corrupt_entries: u64,
    pub store_errors: u64,
}

#[derive(Default)]
struct Counters {
    l1_hits: AtomicU64,
    store_hits: AtomicU64,
    misses: AtomicU64,
    corrupt_entries: AtomicU64,
    store_errors: AtomicU64,
}

/// Content-addressed embedding cache.
///
/// Concurrent misses for the same text may both reach the provider; the
/// store keeps whichever write lands last, and both are valid vectors.
pub struct EmbeddingCache {
    provider: Arc<dyn IEmbeddingProvider>,
    store: Arc<dyn IEmbeddingStore>,
    l1: Option<L1MemoryCache>,
    preview_chars: usize,
    timeout: Duration,
    counters: Counters,
}

impl EmbeddingCache {
    pub fn new(
        provider: Arc<dyn IEmbeddingProvider>,
        store: Arc<dyn IEmbeddingStore>,
        config: &EmbeddingConfig,
    ) -> Self {
        let l1 = (config.l1_cache_size > 0).then(|| L1MemoryCache::new(config.l1_cache_size));
        tracing::info!(
            provider = provider.name(),
            dims = provider.dimensions(),
            l1_capacity = config.l1_cache_size,
            "embedding cache initialized"
        );
        Self {
            provider,
            store,
            l1,
            preview_chars: config.preview_chars,
            timeout: config.timeout(),
            counters: Counters::default(),
        }
    }

    /// Return the vector for `text`, computing and storing it on a miss.
    pub async fn get_or_compute(&self, text: &str) -> TributaryResult<Vec<f32>> {
        let hash = content_hash(text);

        if let Some(vector) = self.l1.as_ref().and_then(|l1| l1.get(&hash)) {
            self.counters.l1_hits.fetch_add(1, Ordering::Relaxed);
            debug!(hash = %hash, tier = "L1", "embedding cache hit");
            self.touch(&hash).await;
            return Ok(vector);
        }

        if let Some(vector) = self.lookup_store(&hash).await {
            self.counters.store_hits.fetch_add(1, Ordering::Relaxed);
            debug!(hash = %hash, tier = "store", "embedding cache hit");
            self.touch(&hash).await;
            if let Some(l1) = &self.l1 {
                l1.insert(hash, vector.clone());
            }
            return Ok(vector);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        debug!(hash = %hash, "embedding cache miss");
        let vector = self.compute(text).await?;

        let preview: String = text.chars().take(self.preview_chars).collect();
        let row_hash = hash.clone();
        let embedding = format_vector(&vector);
        let written = self
            .on_store(move |store| store.upsert(&row_hash, &preview, &embedding))
            .await;
        if let Err(e) = written {
            self.counters.store_errors.fetch_add(1, Ordering::Relaxed);
            events::cache_store_failed("upsert", &e);
        }
        if let Some(l1) = &self.l1 {
            l1.insert(hash, vector.clone());
        }
        Ok(vector)
    }

    /// The persisted entry for `text`, if any and if it parses.
    pub async fn entry(&self, text: &str) -> TributaryResult<Option<EmbeddingCacheEntry>> {
        let hash = content_hash(text);
        let Some(row) = self.on_store(move |store| store.fetch(&hash)).await? else {
            return Ok(None);
        };
        let vector = parse_vector(&row.embedding, Some(self.provider.dimensions()))?;
        Ok(Some(EmbeddingCacheEntry {
            content_hash: row.content_hash,
            content_preview: row.content_preview,
            vector,
            usage_count: row.usage_count,
            last_used: row.last_used,
        }))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_hits: self.counters.l1_hits.load(Ordering::Relaxed),
            store_hits: self.counters.store_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            corrupt_entries: self.counters.corrupt_entries.load(Ordering::Relaxed),
            store_errors: self.counters.store_errors.load(Ordering::Relaxed),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Parsed vector from the store, or `None` for a miss, an unreadable
    /// store, or a corrupt row.
    async fn lookup_store(&self, hash: &str) -> Option<Vec<f32>> {
        let key = hash.to_string();
        let row = match self.on_store(move |store| store.fetch(&key)).await {
            Ok(row) => row?,
            Err(e) => {
                self.counters.store_errors.fetch_add(1, Ordering::Relaxed);
                events::cache_store_failed("fetch", &e);
                return None;
            }
        };
        match parse_vector(&row.embedding, Some(self.provider.dimensions())) {
            Ok(vector) => Some(vector),
            Err(e) => {
                self.counters.corrupt_entries.fetch_add(1, Ordering::Relaxed);
                events::cache_corrupt(hash, &e);
                None
            }
        }
    }

    async fn touch(&self, hash: &str) {
        let key = hash.to_string();
        if let Err(e) = self.on_store(move |store| store.touch(&key)).await {
            self.counters.store_errors.fetch_add(1, Ordering::Relaxed);
            events::cache_store_failed("touch", &e);
        }
    }

    /// Run one store call off the async runtime.
    async fn on_store<F, T>(&self, op: F) -> TributaryResult<T>
    where
        F: FnOnce(&dyn IEmbeddingStore) -> TributaryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StorageError::BlockingTaskFailed {
                reason: e.to_string(),
            })?
    }

    async fn compute(&self, text: &str) -> TributaryResult<Vec<f32>> {
        let vector = tokio::time::timeout(self.timeout, self.provider.embed(text))
            .await
            .map_err(|_| TributaryError::timeout("embedding provider", self.timeout))??;

        let expected = self.provider.dimensions();
        if vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: vector.len(),
            }
            .into());
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "provider returned non-finite values".to_string(),
            }
            .into());
        }
        Ok(vector)
    }
}

/// The cache is itself a provider, so anything that needs vectors can be
/// handed the cached path.
#[async_trait]
impl IEmbeddingProvider for EmbeddingCache {
    async fn embed(&self, text: &str) -> TributaryResult<Vec<f32>> {
        self.get_or_compute(text).await
    }

    fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
