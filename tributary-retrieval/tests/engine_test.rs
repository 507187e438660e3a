use std::sync::Arc;
use std::time::{Duration, Instant};

use test_fixtures::{
    backend_hit, hits, FixedCrossEncoder, ScriptedCompletion, StaticSearcher, StubRelationalStore,
};
use tributary_core::config::{RerankConfig, RetrievalConfig};
use tributary_core::models::{HitSource, Modality, ScoreKind};
use tributary_core::traits::{ICrossEncoder, IModalitySearcher, IRelationalStore, ITextCompletion};
use tributary_retrieval::{
    CrossEncoderStage, LexicalSearcher, LlmRerankStage, Reranker, RetrievalEngine,
};

fn reranker(
    encoder: Option<Arc<dyn ICrossEncoder>>,
    completion: Option<Arc<dyn ITextCompletion>>,
) -> Reranker {
    let config = RerankConfig::default();
    Reranker::new(
        CrossEncoderStage::new(encoder, config.cross_encoder_timeout()),
        LlmRerankStage::new(completion, Some("rerank-model".to_string()), &config),
    )
}

fn engine(
    dense: Arc<dyn IModalitySearcher>,
    vector_db: Arc<dyn IModalitySearcher>,
    lexical: Arc<dyn IModalitySearcher>,
    reranker: Reranker,
) -> RetrievalEngine {
    RetrievalEngine::new(
        dense,
        vector_db,
        lexical,
        reranker,
        RetrievalConfig::default(),
        RerankConfig::default(),
    )
}

fn searcher(modality: Modality, ids: &[&str]) -> Arc<dyn IModalitySearcher> {
    Arc::new(StaticSearcher::new(modality, hits(modality, ids)))
}

fn ids(hits: &[tributary_core::models::RetrievedHit]) -> Vec<String> {
    hits.iter().map(|h| h.document_id.clone()).collect()
}

/// Three lists of five, two ids shared by all of them.
fn shared_engine(reranker: Reranker) -> RetrievalEngine {
    engine(
        searcher(Modality::Dense, &["dense-1", "shared-a", "dense-2", "shared-b", "dense-3"]),
        searcher(Modality::VectorDb, &["shared-b", "vec-1", "shared-a", "vec-2", "vec-3"]),
        searcher(Modality::Lexical, &["lex-1", "lex-2", "shared-a", "lex-3", "shared-b"]),
        reranker,
    )
}

// ── Fusion through the engine ────────────────────────────────────────────

#[tokio::test]
async fn shared_document_ranks_first() {
    let engine = shared_engine(reranker(None, None));
    let hits = engine.retrieve("query", 5).await;

    assert_eq!(hits.len(), RerankConfig::default().final_top_k);
    assert!(hits[0].document_id.starts_with("shared-"));
    assert!(hits[1].document_id.starts_with("shared-"));
    assert_eq!(hits[0].source, HitSource::Fusion);
    assert!(hits[0].provenance.passed_through(HitSource::Dense));
    assert!(hits[0].provenance.passed_through(HitSource::VectorDb));
    assert!(hits[0].provenance.passed_through(HitSource::Lexical));
}

#[tokio::test]
async fn missing_modalities_renormalize_weights() {
    let fallback = Arc::new(StubRelationalStore::new(
        Vec::new(),
        vec![
            backend_hit("lex-1", None, 9.0),
            backend_hit("lex-2", None, 8.0),
            backend_hit("lex-3", None, 7.0),
        ],
    ));
    let lexical = LexicalSearcher::new(
        None,
        Some(fallback.clone() as Arc<dyn IRelationalStore>),
        &RetrievalConfig::default(),
    );
    let engine = engine(
        searcher(Modality::Dense, &["dense-1", "dense-2"]),
        Arc::new(StaticSearcher::empty(Modality::VectorDb)),
        Arc::new(lexical),
        reranker(None, None),
    );

    let hits = engine.retrieve("query", 5).await;
    assert_eq!(fallback.fulltext_calls(), 1);
    assert_eq!(hits.len(), 5);

    let score_of = |id: &str| {
        hits.iter()
            .find(|h| h.document_id == id)
            .and_then(|h| h.provenance.score(ScoreKind::Fused))
            .unwrap()
    };
    assert!((score_of("dense-1") - (0.4 / 0.7) / 61.0).abs() < 1e-12);
    assert!((score_of("lex-1") - (0.3 / 0.7) / 61.0).abs() < 1e-12);
    assert!((score_of("lex-3") - (0.3 / 0.7) / 63.0).abs() < 1e-12);
    assert_eq!(ids(&hits)[0], "dense-1");
}

#[tokio::test]
async fn nothing_found_is_empty() {
    let engine = engine(
        Arc::new(StaticSearcher::empty(Modality::Dense)),
        Arc::new(StaticSearcher::empty(Modality::VectorDb)),
        Arc::new(StaticSearcher::empty(Modality::Lexical)),
        reranker(Some(Arc::new(FixedCrossEncoder::failing())), None),
    );
    assert!(engine.retrieve("query", 5).await.is_empty());
}

// ── Search fan-out ───────────────────────────────────────────────────────

#[tokio::test]
async fn zero_k_uses_default_for_every_searcher() {
    let dense = Arc::new(StaticSearcher::new(Modality::Dense, hits(Modality::Dense, &["a"])));
    let vector_db = Arc::new(StaticSearcher::empty(Modality::VectorDb));
    let lexical = Arc::new(StaticSearcher::empty(Modality::Lexical));
    let engine = engine(dense.clone(), vector_db.clone(), lexical.clone(), reranker(None, None));

    engine.retrieve("query", 0).await;
    let default_k = RetrievalConfig::default().default_k;
    assert_eq!(dense.requested_k(), vec![default_k]);
    assert_eq!(vector_db.requested_k(), vec![default_k]);
    assert_eq!(lexical.requested_k(), vec![default_k]);
}

#[tokio::test]
async fn searchers_run_concurrently() {
    let delay = Duration::from_millis(300);
    let slow = |modality: Modality, id: &str| -> Arc<dyn IModalitySearcher> {
        Arc::new(StaticSearcher::new(modality, hits(modality, &[id])).with_delay(delay))
    };
    let engine = engine(
        slow(Modality::Dense, "a"),
        slow(Modality::VectorDb, "b"),
        slow(Modality::Lexical, "c"),
        reranker(None, None),
    );

    let started = Instant::now();
    let lists = engine.search_all("query", 3).await;
    assert!(started.elapsed() < Duration::from_millis(800));

    let modalities: Vec<Modality> = lists.iter().map(|l| l.modality).collect();
    assert_eq!(modalities, Modality::ALL.to_vec());
    assert!(lists.iter().all(|l| l.hits.len() == 1));
}

// ── Reranking ────────────────────────────────────────────────────────────

fn promote(id: &'static str) -> Arc<dyn ICrossEncoder> {
    let target = format!("content of {id}");
    Arc::new(FixedCrossEncoder::scoring(move |p| if p == target { 1.0 } else { 0.0 }))
}

#[tokio::test]
async fn cross_encoder_reorders_fused_list() {
    let engine = shared_engine(reranker(Some(promote("lex-3")), None));
    let hits = engine.retrieve("query", 5).await;

    assert_eq!(hits[0].document_id, "lex-3");
    assert_eq!(hits[0].source, HitSource::Rerank);
    assert_eq!(hits[0].provenance.score(ScoreKind::CrossEncoder), Some(1.0));
    assert!(hits[0].provenance.passed_through(HitSource::Fusion));
}

#[tokio::test]
async fn short_llm_reply_keeps_cross_encoder_order() {
    let stage_a_only = shared_engine(reranker(Some(promote("lex-3")), None));
    let expected = ids(&stage_a_only.retrieve("query", 5).await);

    let completion = Arc::new(ScriptedCompletion::replies(["[0.9, 0.1]"]));
    let engine = shared_engine(reranker(
        Some(promote("lex-3")),
        Some(completion.clone() as Arc<dyn ITextCompletion>),
    ));
    let hits = engine.retrieve("query", 5).await;

    assert_eq!(ids(&hits), expected);
    assert_eq!(completion.requests().len(), 1);
    assert!(hits.iter().all(|h| h.provenance.score(ScoreKind::LlmRerank).is_none()));
}

#[tokio::test]
async fn llm_scores_decide_final_order() {
    // Ten candidates reach the LLM; the last one gets the top score.
    let reply = "```json\n[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.95]\n```";
    let completion = Arc::new(ScriptedCompletion::replies([reply]));
    let engine = shared_engine(reranker(None, Some(completion.clone() as Arc<dyn ITextCompletion>)));

    let fused_order = ids(&shared_engine(reranker(None, None)).retrieve("query", 10).await);
    let hits = engine.retrieve("query", 5).await;

    assert_eq!(hits.len(), 6);
    assert_eq!(hits[0].provenance.score(ScoreKind::LlmRerank), Some(0.95));
    assert_eq!(hits[0].source, HitSource::Rerank);
    // The remaining tied scores keep their incoming order.
    assert_eq!(ids(&hits[1..]), fused_order[..5].to_vec());

    let request = &completion.requests()[0];
    assert_eq!(request.model.as_deref(), Some("rerank-model"));
    assert_eq!(request.temperature, 0.0);
}
