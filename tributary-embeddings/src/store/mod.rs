//! Embedding store implementations that live in this crate. The SQLite
//! store is `tributary_storage::StorageEngine`.

mod memory_store;

pub use memory_store::InMemoryEmbeddingStore;
