use async_trait::async_trait;

use crate::errors::TributaryResult;
use crate::models::{BackendHit, KnnRequest};

/// External nearest-neighbor index.
#[async_trait]
pub trait IVectorIndex: Send + Sync {
    async fn knn(&self, request: KnnRequest) -> TributaryResult<Vec<BackendHit>>;
}

/// External full-text backend with native relevance scoring.
#[async_trait]
pub trait ILexicalIndex: Send + Sync {
    /// Match documents containing every query term.
    async fn term_match(&self, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>>;
}

/// Relational store with vector similarity and full-text operators.
#[async_trait]
pub trait IRelationalStore: Send + Sync {
    /// Rows whose indexing status is completed, by distance ascending.
    /// `native_score` is `1 - distance`.
    async fn vector_search(&self, vector: &[f32], k: usize) -> TributaryResult<Vec<BackendHit>>;

    /// Full-text rank query, rank descending.
    async fn fulltext_search(&self, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>>;
}
