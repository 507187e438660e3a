//! Process-local embedding store on a `DashMap`, used when no database is
//! configured.

use chrono::Utc;
use dashmap::DashMap;

use tributary_core::errors::TributaryResult;
use tributary_core::models::EmbeddingCacheRow;
use tributary_core::traits::IEmbeddingStore;

#[derive(Default)]
pub struct InMemoryEmbeddingStore {
    rows: DashMap<String, EmbeddingCacheRow>,
}

impl InMemoryEmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IEmbeddingStore for InMemoryEmbeddingStore {
    fn fetch(&self, content_hash: &str) -> TributaryResult<Option<EmbeddingCacheRow>> {
        Ok(self.rows.get(content_hash).map(|row| row.value().clone()))
    }

    fn touch(&self, content_hash: &str) -> TributaryResult<()> {
        if let Some(mut row) = self.rows.get_mut(content_hash) {
            row.usage_count += 1;
            row.last_used = Utc::now();
        }
        Ok(())
    }

    fn upsert(&self, content_hash: &str, preview: &str, embedding: &str) -> TributaryResult<()> {
        let now = Utc::now();
        self.rows
            .entry(content_hash.to_string())
            .and_modify(|row| {
                row.content_preview = preview.to_string();
                row.embedding = embedding.to_string();
                row.usage_count += 1;
                row.last_used = now;
            })
            .or_insert_with(|| EmbeddingCacheRow {
                content_hash: content_hash.to_string(),
                content_preview: preview.to_string(),
                embedding: embedding.to_string(),
                usage_count: 1,
                last_used: now,
            });
        Ok(())
    }

    fn len(&self) -> TributaryResult<usize> {
        Ok(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_inserts_then_bumps() {
        let store = InMemoryEmbeddingStore::new();
        store.upsert("h", "p", "[1]").unwrap();
        store.upsert("h", "p", "[2]").unwrap();
        let row = store.fetch("h").unwrap().unwrap();
        assert_eq!(row.usage_count, 2);
        assert_eq!(row.embedding, "[2]");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn touch_unknown_is_noop() {
        let store = InMemoryEmbeddingStore::new();
        store.touch("missing").unwrap();
        assert!(store.is_empty().unwrap());
    }
}
