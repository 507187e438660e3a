use crate::errors::TributaryResult;
use crate::models::EmbeddingCacheRow;

/// Persistent row-per-hash embedding cache table.
///
/// Calls are synchronous and may block on a lock or local disk I/O. Async
/// callers run them on the blocking pool.
pub trait IEmbeddingStore: Send + Sync {
    /// Look up a row by content hash without touching its counters.
    fn fetch(&self, content_hash: &str) -> TributaryResult<Option<EmbeddingCacheRow>>;

    /// Record a hit: `usage_count += 1`, `last_used = now`.
    fn touch(&self, content_hash: &str) -> TributaryResult<()>;

    /// Insert a new row, or on conflict replace the embedding and bump the
    /// counters (last writer wins).
    fn upsert(&self, content_hash: &str, preview: &str, embedding: &str) -> TributaryResult<()>;

    /// Number of rows.
    fn len(&self) -> TributaryResult<usize>;

    fn is_empty(&self) -> TributaryResult<bool> {
        Ok(self.len()? == 0)
    }
}
