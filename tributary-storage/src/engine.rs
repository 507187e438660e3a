//! StorageEngine: owns the connection, runs migrations, and implements the
//! relational-store and embedding-store traits.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use tributary_core::errors::{StorageError, TributaryResult};
use tributary_core::models::{BackendHit, EmbeddingCacheRow};
use tributary_core::traits::{IEmbeddingStore, IRelationalStore};

use crate::migrations;
use crate::pool::DbConnection;
use crate::queries::{chunk_ops, embedding_cache, fulltext_search, vector_search};

/// SQLite-backed store. Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct StorageEngine {
    db: Arc<DbConnection>,
}

impl StorageEngine {
    /// Open (or create) a database file and run migrations.
    pub fn open(path: &Path) -> TributaryResult<Self> {
        let engine = Self {
            db: Arc::new(DbConnection::open(path)?),
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> TributaryResult<Self> {
        let engine = Self {
            db: Arc::new(DbConnection::open_in_memory()?),
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open from a configured location; `":memory:"` means in-memory.
    pub fn open_configured(location: &str) -> TributaryResult<Self> {
        if location == ":memory:" {
            Self::open_in_memory()
        } else {
            Self::open(Path::new(location))
        }
    }

    fn initialize(&self) -> TributaryResult<()> {
        let version = self.db.with_conn(migrations::run_migrations)?;
        tracing::debug!(schema_version = version, "storage initialized");
        Ok(())
    }

    /// Register a chunk's content. It is searchable by full text at once
    /// and by vector once an embedding with status `completed` is stored.
    pub fn insert_chunk(
        &self,
        chunk_id: &str,
        document_id: &str,
        content: &str,
        metadata: &serde_json::Map<String, serde_json::Value>,
    ) -> TributaryResult<()> {
        self.db
            .with_conn(|conn| chunk_ops::insert_chunk(conn, chunk_id, document_id, content, metadata))
    }

    pub fn store_chunk_embedding(
        &self,
        chunk_id: &str,
        embedding: &[f32],
        status: &str,
        model_name: &str,
    ) -> TributaryResult<()> {
        self.db.with_conn(|conn| {
            chunk_ops::store_chunk_embedding(conn, chunk_id, embedding, status, model_name)
        })
    }

    pub fn set_embedding_status(&self, chunk_id: &str, status: &str) -> TributaryResult<bool> {
        self.db
            .with_conn(|conn| chunk_ops::set_embedding_status(conn, chunk_id, status))
    }

    pub fn delete_chunk(&self, chunk_id: &str) -> TributaryResult<bool> {
        self.db.with_conn(|conn| chunk_ops::delete_chunk(conn, chunk_id))
    }

    pub fn chunk_count(&self) -> TributaryResult<usize> {
        self.db.with_conn(chunk_ops::count_chunks)
    }

    pub fn schema_version(&self) -> TributaryResult<u32> {
        self.db.with_conn(migrations::current_version)
    }

    /// Run a blocking closure against the connection off the async runtime.
    async fn blocking<F, T>(&self, f: F) -> TributaryResult<T>
    where
        F: FnOnce(&DbConnection) -> TributaryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| StorageError::BlockingTaskFailed {
                reason: e.to_string(),
            })?
    }
}

#[async_trait]
impl IRelationalStore for StorageEngine {
    async fn vector_search(&self, vector: &[f32], k: usize) -> TributaryResult<Vec<BackendHit>> {
        let query = vector.to_vec();
        self.blocking(move |db| db.with_conn(|conn| vector_search::search_vector(conn, &query, k)))
            .await
    }

    async fn fulltext_search(&self, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
        let query = query.to_string();
        self.blocking(move |db| {
            db.with_conn(|conn| fulltext_search::search_fulltext(conn, &query, k))
        })
        .await
    }
}

impl IEmbeddingStore for StorageEngine {
    fn fetch(&self, content_hash: &str) -> TributaryResult<Option<EmbeddingCacheRow>> {
        self.db
            .with_conn(|conn| embedding_cache::fetch(conn, content_hash))
    }

    fn touch(&self, content_hash: &str) -> TributaryResult<()> {
        self.db
            .with_conn(|conn| embedding_cache::touch(conn, content_hash))
    }

    fn upsert(&self, content_hash: &str, preview: &str, embedding: &str) -> TributaryResult<()> {
        self.db
            .with_conn(|conn| embedding_cache::upsert(conn, content_hash, preview, embedding))
    }

    fn len(&self) -> TributaryResult<usize> {
        self.db.with_conn(embedding_cache::count)
    }
}
