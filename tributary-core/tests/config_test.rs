use std::collections::HashMap;

use tributary_core::config::{defaults, TributaryConfig};
use tributary_core::models::Modality;

#[test]
fn defaults_match_constants() {
    let cfg = TributaryConfig::default();
    assert_eq!(cfg.retrieval.rrf_k, 60);
    assert_eq!(cfg.retrieval.default_k, defaults::DEFAULT_K);
    assert_eq!(cfg.rerank.rerank_top_k, 10);
    assert_eq!(cfg.rerank.final_top_k, 6);
    assert_eq!(cfg.session.ttl_secs, 3600);
    assert_eq!(cfg.embedding.preview_chars, 200);
    assert!((cfg.retrieval.weights.total() - 1.0).abs() < 1e-12);
    assert!(cfg.generation.api_key.is_none());
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_toml_fills_defaults() {
    let cfg = TributaryConfig::from_toml(
        r#"
        [retrieval]
        default_k = 20

        [retrieval.weights]
        dense = 0.5

        [backends]
        elasticsearch_url = "http://localhost:9200"
        "#,
    )
    .unwrap();

    assert_eq!(cfg.retrieval.default_k, 20);
    assert_eq!(cfg.retrieval.weights.get(Modality::Dense), 0.5);
    assert_eq!(cfg.retrieval.weights.get(Modality::Lexical), 0.3);
    assert_eq!(cfg.retrieval.rrf_k, 60);
    assert_eq!(
        cfg.backends.elasticsearch_url.as_deref(),
        Some("http://localhost:9200")
    );
    assert_eq!(cfg.backends.elasticsearch_index, "document_chunks");
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = TributaryConfig::from_toml("[retrieval\nrrf_k = ").unwrap_err();
    assert!(err.to_string().contains("config error"));
}

#[test]
fn env_overrides_prefer_prefixed_names() {
    let env: HashMap<&str, &str> = [
        ("OPENAI_API_KEY", "bare-key"),
        ("TRIBUTARY_OPENAI_API_KEY", "prefixed-key"),
        ("ELASTICSEARCH_URL", "http://es:9200"),
        ("TRIBUTARY_DATABASE_PATH", "/tmp/tributary.db"),
    ]
    .into_iter()
    .collect();

    let mut cfg = TributaryConfig::default();
    cfg.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.generation.api_key.as_deref(), Some("prefixed-key"));
    assert!(cfg.generation.is_configured());
    assert_eq!(cfg.backends.elasticsearch_url.as_deref(), Some("http://es:9200"));
    assert_eq!(cfg.backends.database_path.as_deref(), Some("/tmp/tributary.db"));
}

#[test]
fn blank_env_values_are_ignored() {
    let mut cfg = TributaryConfig::default();
    cfg.apply_overrides_from(|k| (k == "OPENAI_API_KEY").then(|| "   ".to_string()));
    assert!(cfg.generation.api_key.is_none());
}

#[test]
fn validate_rejects_bad_values() {
    let mut cfg = TributaryConfig::default();
    cfg.retrieval.weights.dense = 0.0;
    cfg.retrieval.weights.vector_db = 0.0;
    cfg.retrieval.weights.lexical = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = TributaryConfig::default();
    cfg.rerank.final_top_k = 20;
    assert!(cfg.validate().is_err());

    let mut cfg = TributaryConfig::default();
    cfg.embedding.provider = "api".into();
    assert!(cfg.validate().is_err());
}
