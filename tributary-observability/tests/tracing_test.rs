use tributary_core::models::Modality;
use tributary_observability::events;
use tributary_observability::tracing_setup::{names, DEFAULT_FILTER, LOG_ENV_VAR};
use tributary_observability::{answer_span, init_tracing, init_tracing_json, retrieval_span};

#[test]
fn repeated_initialization_is_harmless() {
    init_tracing();
    init_tracing();
    init_tracing_json();
}

#[test]
fn events_can_be_emitted_without_a_subscriber() {
    let error = "connection refused";
    events::searcher_failed(Modality::Dense, "elasticsearch", &error);
    events::backend_fell_back(Modality::Lexical, "elasticsearch", "sqlite-fts5", &error);
    events::stage_fell_back("cross_encoder", &"timeout");
    events::cache_corrupt("abc123", &"not a number");
    events::cache_store_failed("upsert", &error);
    events::answer_completed("req-1", 3, true, 42);
}

#[test]
fn spans_enter_and_exit() {
    init_tracing();
    let span = answer_span!("req-1");
    let _guard = span.enter();
    let inner = retrieval_span!(12usize);
    let _inner = inner.enter();
}

#[test]
fn filter_constants() {
    assert_eq!(LOG_ENV_VAR, "TRIBUTARY_LOG");
    assert_eq!(DEFAULT_FILTER, "tributary=info");
    assert_eq!(names::ANSWER, "tributary.answer");
}
