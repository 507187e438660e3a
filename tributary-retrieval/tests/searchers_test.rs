use std::sync::Arc;
use std::time::Duration;

use test_fixtures::{
    backend_hit, sample_corpus, CountingEmbedder, StubLexicalIndex, StubRelationalStore,
    StubVectorIndex,
};
use tributary_core::config::RetrievalConfig;
use tributary_core::constants::INDEXING_STATUS_COMPLETED;
use tributary_core::models::{HitSource, ScoreKind};
use tributary_core::traits::{
    IEmbeddingProvider, ILexicalIndex, IModalitySearcher, IRelationalStore, IVectorIndex,
};
use tributary_embeddings::HashingFallback;
use tributary_retrieval::{DenseKnnSearcher, LexicalSearcher, VectorDbSearcher};
use tributary_storage::StorageEngine;

const DIMS: usize = 64;

fn config() -> RetrievalConfig {
    RetrievalConfig {
        search_timeout_ms: 200,
        ..Default::default()
    }
}

/// A SQLite store holding the sample corpus, every chunk embedded with the
/// feature-hashing provider and marked completed.
async fn corpus_store(embedder: &HashingFallback) -> StorageEngine {
    let store = StorageEngine::open_in_memory().unwrap();
    for chunk in sample_corpus() {
        store
            .insert_chunk(&chunk.chunk_id, &chunk.document_id, &chunk.content, &chunk.metadata)
            .unwrap();
        let vector = embedder.embed(&chunk.content).await.unwrap();
        store
            .store_chunk_embedding(&chunk.chunk_id, &vector, INDEXING_STATUS_COMPLETED, embedder.name())
            .unwrap();
    }
    store
}

// ── Dense KNN ────────────────────────────────────────────────────────────

#[tokio::test]
async fn dense_sends_oversampled_cosine_request() {
    let index = Arc::new(StubVectorIndex::new(vec![
        backend_hit("a", Some("a-1"), 0.9),
        backend_hit("b", Some("b-1"), 0.8),
    ]));
    let embedder = Arc::new(CountingEmbedder::new(DIMS));
    let searcher = DenseKnnSearcher::new(
        Some(index.clone() as Arc<dyn IVectorIndex>),
        embedder.clone(),
        &config(),
    );

    let hits = searcher.search("async runtime", 3).await;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document_id, "a");
    assert_eq!(hits[0].source, HitSource::Dense);
    assert_eq!(hits[0].provenance.score(ScoreKind::DenseNative), Some(0.9));

    searcher.search("async runtime", 20).await;
    let requests = index.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].k, 3);
    assert_eq!(requests[0].candidate_pool, 50);
    assert_eq!(requests[0].metric.as_str(), "cosine");
    assert_eq!(requests[0].vector, CountingEmbedder::vector_for("async runtime", DIMS));
    assert_eq!(requests[1].candidate_pool, 100);
    assert_eq!(embedder.calls(), 2);
}

#[tokio::test]
async fn dense_huge_k_saturates_candidate_pool() {
    let index = Arc::new(StubVectorIndex::new(vec![backend_hit("a", Some("a-1"), 0.9)]));
    let searcher = DenseKnnSearcher::new(
        Some(index.clone() as Arc<dyn IVectorIndex>),
        Arc::new(CountingEmbedder::new(DIMS)),
        &config(),
    );

    let hits = searcher.search("q", usize::MAX).await;
    assert_eq!(hits.len(), 1);
    let requests = index.requests();
    assert_eq!(requests[0].k, usize::MAX);
    assert_eq!(requests[0].candidate_pool, usize::MAX);
}

#[tokio::test]
async fn dense_without_index_skips_embedding() {
    let embedder = Arc::new(CountingEmbedder::new(DIMS));
    let searcher = DenseKnnSearcher::new(None, embedder.clone(), &config());
    assert!(searcher.search("anything", 5).await.is_empty());
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn dense_failures_yield_empty() {
    let failing = DenseKnnSearcher::new(
        Some(Arc::new(StubVectorIndex::failing()) as Arc<dyn IVectorIndex>),
        Arc::new(CountingEmbedder::new(DIMS)),
        &config(),
    );
    assert!(failing.search("q", 5).await.is_empty());

    let slow = DenseKnnSearcher::new(
        Some(Arc::new(
            StubVectorIndex::new(vec![backend_hit("a", None, 1.0)]).with_delay(Duration::from_secs(2)),
        ) as Arc<dyn IVectorIndex>),
        Arc::new(CountingEmbedder::new(DIMS)),
        &config(),
    );
    assert!(slow.search("q", 5).await.is_empty());

    let embedder = Arc::new(CountingEmbedder::new(DIMS));
    embedder.set_failing(true);
    let index = Arc::new(StubVectorIndex::new(vec![backend_hit("a", None, 1.0)]));
    let no_vector = DenseKnnSearcher::new(Some(index.clone() as Arc<dyn IVectorIndex>), embedder, &config());
    assert!(no_vector.search("q", 5).await.is_empty());
    assert!(index.requests().is_empty());
}

// ── Vector-DB ────────────────────────────────────────────────────────────

#[tokio::test]
async fn vector_db_ranks_completed_chunks_by_similarity() {
    let embedder = HashingFallback::new(DIMS);
    let store = corpus_store(&embedder).await;
    let corpus = sample_corpus();
    let target = &corpus[2];

    let searcher = VectorDbSearcher::new(
        Some(Arc::new(store) as Arc<dyn IRelationalStore>),
        Arc::new(HashingFallback::new(DIMS)),
        &config(),
    );
    let hits = searcher.search(&target.content, 3).await;

    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].chunk_id.as_deref(), Some(target.chunk_id.as_str()));
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(hits[0].metadata["title"], "The Rust book");
}

#[tokio::test]
async fn vector_db_skips_pending_chunks() {
    let embedder = HashingFallback::new(DIMS);
    let store = corpus_store(&embedder).await;
    store.set_embedding_status("garden-1", "pending").unwrap();

    let searcher = VectorDbSearcher::new(
        Some(Arc::new(store) as Arc<dyn IRelationalStore>),
        Arc::new(HashingFallback::new(DIMS)),
        &config(),
    );
    let hits = searcher.search("plant tomatoes after the last frost", 10).await;
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|h| h.chunk_id.as_deref() != Some("garden-1")));
}

#[tokio::test]
async fn vector_db_unconfigured_or_failing_is_empty() {
    let unconfigured = VectorDbSearcher::new(None, Arc::new(CountingEmbedder::new(DIMS)), &config());
    assert!(unconfigured.search("q", 5).await.is_empty());

    let store = Arc::new(StubRelationalStore::failing());
    let failing = VectorDbSearcher::new(
        Some(store.clone() as Arc<dyn IRelationalStore>),
        Arc::new(CountingEmbedder::new(DIMS)),
        &config(),
    );
    assert!(failing.search("q", 5).await.is_empty());
    assert_eq!(store.vector_calls(), 1);
}

// ── Lexical ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn lexical_uses_primary_when_healthy() {
    let primary = Arc::new(StubLexicalIndex::new(vec![
        backend_hit("low", None, 1.5),
        backend_hit("high", None, 7.25),
    ]));
    let fallback = Arc::new(StubRelationalStore::new(Vec::new(), vec![backend_hit("fb", None, 1.0)]));
    let searcher = LexicalSearcher::new(
        Some(primary.clone() as Arc<dyn ILexicalIndex>),
        Some(fallback.clone() as Arc<dyn IRelationalStore>),
        &config(),
    );

    let hits = searcher.search("rust ownership", 4).await;
    let ids: Vec<&str> = hits.iter().map(|h| h.document_id.as_str()).collect();
    assert_eq!(ids, vec!["high", "low"]);
    assert_eq!(hits[0].source, HitSource::Lexical);
    assert_eq!(primary.calls(), vec![("rust ownership".to_string(), 4)]);
    assert_eq!(fallback.fulltext_calls(), 0);
}

#[tokio::test]
async fn lexical_empty_primary_result_is_final() {
    let fallback = Arc::new(StubRelationalStore::new(Vec::new(), vec![backend_hit("fb", None, 1.0)]));
    let searcher = LexicalSearcher::new(
        Some(Arc::new(StubLexicalIndex::new(Vec::new())) as Arc<dyn ILexicalIndex>),
        Some(fallback.clone() as Arc<dyn IRelationalStore>),
        &config(),
    );
    assert!(searcher.search("nothing matches", 4).await.is_empty());
    assert_eq!(fallback.fulltext_calls(), 0);
}

#[tokio::test]
async fn lexical_failing_primary_falls_back() {
    let fallback = Arc::new(StubRelationalStore::new(
        Vec::new(),
        vec![backend_hit("fb-1", None, 3.0), backend_hit("fb-2", None, 2.0)],
    ));
    let searcher = LexicalSearcher::new(
        Some(Arc::new(StubLexicalIndex::failing()) as Arc<dyn ILexicalIndex>),
        Some(fallback.clone() as Arc<dyn IRelationalStore>),
        &config(),
    );
    let hits = searcher.search("q", 4).await;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document_id, "fb-1");
    assert_eq!(fallback.fulltext_calls(), 1);
}

#[tokio::test]
async fn lexical_without_primary_uses_sqlite_full_text() {
    let store = corpus_store(&HashingFallback::new(DIMS)).await;
    let searcher = LexicalSearcher::new(None, Some(Arc::new(store) as Arc<dyn IRelationalStore>), &config());

    let hits = searcher.search("tokio runtime", 10).await;
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.document_id == "tokio-guide"));
    assert!(hits[0].score >= hits[1].score);
    assert!(hits[0].provenance.passed_through(HitSource::Lexical));

    // Every term is required.
    assert!(searcher.search("tokio tomatoes", 10).await.is_empty());
}

#[tokio::test]
async fn lexical_with_nothing_configured_is_empty() {
    let searcher = LexicalSearcher::new(None, None, &config());
    assert!(searcher.search("q", 5).await.is_empty());

    let searcher = LexicalSearcher::new(
        Some(Arc::new(StubLexicalIndex::failing()) as Arc<dyn ILexicalIndex>),
        None,
        &config(),
    );
    assert!(searcher.search("q", 5).await.is_empty());
}
