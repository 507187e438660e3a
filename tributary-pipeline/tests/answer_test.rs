use std::sync::Arc;
use std::time::Duration;

use test_fixtures::{hits, FixedCrossEncoder, ScriptedCompletion, StaticSearcher};
use tributary_core::config::TributaryConfig;
use tributary_core::models::{ConversationTurn, HitSource, Modality, Role};
use tributary_core::traits::{CompletionRequest, ITextCompletion};
use tributary_core::TributaryError;
use tributary_pipeline::AnswerEngine;

/// Replies to rerank requests with equal scores (keeping the order) and to
/// answer prompts with `answer`.
fn completion(answer: &'static str) -> Arc<ScriptedCompletion> {
    Arc::new(ScriptedCompletion::from_fn(move |request: &CompletionRequest| {
        if request.system.is_some() {
            let body: serde_json::Value =
                serde_json::from_str(&request.user).map_err(|e| e.to_string())?;
            let n = body["passages"].as_array().map(Vec::len).unwrap_or(0);
            Ok(format!("[{}]", vec!["0.5"; n].join(",")))
        } else {
            Ok(answer.to_string())
        }
    }))
}

fn answer_prompts(completion: &ScriptedCompletion) -> Vec<String> {
    completion
        .requests()
        .into_iter()
        .filter(|r| r.system.is_none())
        .map(|r| r.user)
        .collect()
}

fn searchers(config: TributaryConfig) -> tributary_pipeline::AnswerEngineBuilder {
    AnswerEngine::builder(config)
        .searcher(Arc::new(StaticSearcher::new(
            Modality::Dense,
            hits(Modality::Dense, &["tokio-guide", "rust-book", "sqlite-notes"]),
        )))
        .searcher(Arc::new(StaticSearcher::new(
            Modality::VectorDb,
            hits(Modality::VectorDb, &["tokio-guide", "garden-almanac"]),
        )))
        .searcher(Arc::new(StaticSearcher::new(
            Modality::Lexical,
            hits(Modality::Lexical, &["rust-book", "tokio-guide"]),
        )))
}

// ── Request validation ───────────────────────────────────────────────────

#[tokio::test]
async fn blank_question_is_rejected() {
    let engine = AnswerEngine::builder(TributaryConfig::default()).build();
    for question in ["", "   \n\t"] {
        let err = engine.answer(question, Some("s"), 5).await.unwrap_err();
        assert!(matches!(err, TributaryError::InvalidQuery { .. }));
    }
    assert!(engine.retrieve("  ", 5).await.is_err());
    assert_eq!(engine.sessions().session_count(), 0);
}

// ── Degraded pipeline ────────────────────────────────────────────────────

#[tokio::test]
async fn nothing_configured_gives_an_empty_answer() {
    let engine = AnswerEngine::builder(TributaryConfig::default()).build();
    assert!(!engine.generates_answers());

    let answer = engine.answer("what is tokio?", None, 5).await.unwrap();
    assert!(answer.answer.is_empty());
    assert!(answer.context.is_empty());
    assert!(answer.citations.is_empty());
    assert!(answer.session_id.is_none());
    assert!(uuid::Uuid::parse_str(&answer.request_id).is_ok());
}

#[tokio::test]
async fn generation_failure_keeps_context() {
    let failing = Arc::new(ScriptedCompletion::failing());
    let engine = searchers(TributaryConfig::default())
        .completion(failing.clone() as Arc<dyn ITextCompletion>)
        .cross_encoder(Arc::new(FixedCrossEncoder::failing()))
        .build();

    let answer = engine.answer("what is tokio?", Some("s1"), 5).await.unwrap();
    assert!(answer.answer.is_empty());
    assert_eq!(answer.context.len(), 4);
    assert_eq!(answer.citations[0], "tokio-guide");
    // Only the question is remembered when nothing was answered.
    assert_eq!(engine.sessions().get("s1"), vec![ConversationTurn::user("what is tokio?")]);
}

#[tokio::test]
async fn slow_generation_times_out() {
    let mut config = TributaryConfig::default();
    config.generation.timeout_ms = 50;
    config.rerank.llm_enabled = false;
    let slow = Arc::new(ScriptedCompletion::replies(["too late"]).with_delay(Duration::from_secs(2)));
    let engine = searchers(config)
        .completion(slow.clone() as Arc<dyn ITextCompletion>)
        .build();

    let answer = engine.answer("what is tokio?", None, 5).await.unwrap();
    assert!(answer.answer.is_empty());
    assert!(!answer.context.is_empty());
}

// ── Answering ────────────────────────────────────────────────────────────

#[tokio::test]
async fn answer_cites_context_in_rank_order() {
    let completion = completion("Tokio is an async runtime [Doc 1].");
    let engine = searchers(TributaryConfig::default())
        .completion(completion.clone() as Arc<dyn ITextCompletion>)
        .build();

    let answer = engine.answer("  what is tokio?  ", Some("s1"), 5).await.unwrap();
    assert_eq!(answer.answer, "Tokio is an async runtime [Doc 1].");
    assert_eq!(answer.session_id.as_deref(), Some("s1"));
    assert_eq!(answer.citations[0], "tokio-guide");
    let ids: Vec<&str> = answer.context.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(answer.citations, ids);
    for (i, doc) in answer.context.iter().enumerate() {
        assert_eq!(doc.rank, i + 1);
        assert_eq!(doc.source, HitSource::Rerank);
        assert_eq!(doc.metadata["doc_id"], doc.document_id.as_str());
    }

    let prompts = answer_prompts(&completion);
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("[Doc 1] content of tokio-guide"));
    assert!(prompts[0].ends_with("Question: what is tokio?\nAnswer:"));
}

#[tokio::test]
async fn session_history_flows_into_the_next_prompt() {
    let completion = completion("An async runtime.");
    let engine = searchers(TributaryConfig::default())
        .completion(completion.clone() as Arc<dyn ITextCompletion>)
        .build();

    engine.answer("what is tokio?", Some("abc"), 5).await.unwrap();
    engine.answer("how are tasks scheduled?", Some("abc"), 5).await.unwrap();

    let prompts = answer_prompts(&completion);
    assert!(!prompts[0].contains("user: what is tokio?"));
    assert!(prompts[1].contains("user: what is tokio?\nassistant: An async runtime."));
    assert_eq!(engine.sessions().get("abc").len(), 4);

    engine.answer("unrelated", Some("other"), 5).await.unwrap();
    assert!(!answer_prompts(&completion)[2].contains("what is tokio?"));
}

#[tokio::test]
async fn answers_can_be_disabled() {
    let mut config = TributaryConfig::default();
    config.generation.answer_enabled = false;
    let completion = completion("unused");
    let engine = searchers(config)
        .completion(completion.clone() as Arc<dyn ITextCompletion>)
        .build();

    let answer = engine.answer("what is tokio?", None, 5).await.unwrap();
    assert!(answer.answer.is_empty());
    assert!(answer_prompts(&completion).is_empty());
    // The LLM rerank stage still runs.
    assert_eq!(completion.requests().len(), 1);
}

// ── Retrieval only and history ───────────────────────────────────────────

#[tokio::test]
async fn retrieve_returns_final_documents_without_generation() {
    let completion = completion("unused");
    let engine = searchers(TributaryConfig::default())
        .completion(completion.clone() as Arc<dyn ITextCompletion>)
        .build();

    let docs = engine.retrieve("what is tokio?", 5).await.unwrap();
    assert_eq!(docs.len(), 4);
    assert_eq!(docs[0].label(), "[Doc 1]");
    assert!(answer_prompts(&completion).is_empty());
    assert_eq!(engine.sessions().session_count(), 0);
}

#[test]
fn record_history_appends_and_ignores_empty_ids() {
    let engine = AnswerEngine::builder(TributaryConfig::default()).build();
    engine.record_history("s", Role::User, "hello");
    engine.record_history("s", Role::Assistant, "hi there");
    engine.record_history("", Role::User, "dropped");

    assert_eq!(
        engine.sessions().get("s"),
        vec![ConversationTurn::user("hello"), ConversationTurn::assistant("hi there")]
    );
    assert_eq!(engine.sessions().session_count(), 1);
}
