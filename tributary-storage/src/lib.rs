//! # tributary-storage
//!
//! SQLite-backed relational store. Provides the Vector-DB modality
//! (cosine search over chunk embeddings whose indexing status is
//! `completed`), the relational full-text fallback for the lexical modality
//! (FTS5 + bm25), and the persistent `embedding_cache` table.
//!
//! ## Modules
//!
//! - `pool`: single connection behind a mutex, pragmas
//! - `migrations`: versioned schema
//! - `queries`: chunk registration, vector search, full-text search, cache rows

pub mod migrations;
pub mod pool;
pub mod queries;

mod engine;

pub use engine::StorageEngine;

use tributary_core::errors::{StorageError, TributaryError};

/// Wrap a SQLite failure message as a workspace error.
pub(crate) fn to_storage_err(message: String) -> TributaryError {
    StorageError::SqliteError { message }.into()
}
