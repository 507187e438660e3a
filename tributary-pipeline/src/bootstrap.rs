//! Composition root: configuration to a wired [`AnswerEngine`].

use std::sync::Arc;

use tracing::info;

use tributary_core::config::{ObservabilityConfig, TributaryConfig};
use tributary_core::errors::TributaryResult;
use tributary_core::traits::{
    IEmbeddingStore, ILexicalIndex, IRelationalStore, ITextCompletion, IVectorIndex,
};
use tributary_embeddings::{create_provider, EmbeddingCache, InMemoryEmbeddingStore};
use tributary_observability::{init_tracing_json, init_tracing_with_filter};
use tributary_retrieval::{ChatCompletionClient, ElasticClient};
use tributary_storage::StorageEngine;

use crate::engine::AnswerEngine;

/// Install the process-wide subscriber described by `config`.
///
/// A bare level such as `debug` applies to the tributary crates only; a
/// full directive (`tributary_retrieval=trace,info`) is used as given.
pub fn init_observability(config: &ObservabilityConfig) {
    if config.json {
        init_tracing_json();
        return;
    }
    let level = config.log_level.trim();
    if level.contains('=') || level.contains(',') {
        init_tracing_with_filter(level);
    } else {
        init_tracing_with_filter(&format!("tributary={level}"));
    }
}

impl AnswerEngine {
    /// Open every configured backend and wire the pipeline.
    ///
    /// - `backends.database_path` → SQLite relational store, full-text
    ///   fallback and persistent embedding cache (in-memory cache otherwise)
    /// - `backends.elasticsearch_url` → vector index and primary lexical index
    /// - `generation.api_key` → answer generation and LLM reranking
    /// - `reranker` feature → local cross-encoder
    pub fn from_config(config: TributaryConfig) -> TributaryResult<Self> {
        config.validate()?;

        let storage = match config.backends.database_path.as_deref() {
            Some(location) => Some(Arc::new(StorageEngine::open_configured(location)?)),
            None => None,
        };
        let elastic = ElasticClient::from_config(&config.backends)?.map(Arc::new);

        let embedding_store: Arc<dyn IEmbeddingStore> = match &storage {
            Some(storage) => storage.clone(),
            None => Arc::new(InMemoryEmbeddingStore::new()),
        };
        let embedder = Arc::new(EmbeddingCache::new(
            create_provider(&config.embedding),
            embedding_store,
            &config.embedding,
        ));

        info!(
            relational = storage.is_some(),
            elasticsearch = elastic.is_some(),
            generation = config.generation.is_configured(),
            embedder = embedder.provider_name(),
            "pipeline backends resolved"
        );

        let mut builder = AnswerEngine::builder(config.clone()).embedder(embedder);
        if let Some(storage) = storage {
            builder = builder.relational_store(storage as Arc<dyn IRelationalStore>);
        }
        if let Some(elastic) = elastic {
            builder = builder
                .vector_index(elastic.clone() as Arc<dyn IVectorIndex>)
                .lexical_index(elastic as Arc<dyn ILexicalIndex>);
        }
        if let Some(client) = ChatCompletionClient::from_config(&config.generation) {
            builder = builder.completion(Arc::new(client) as Arc<dyn ITextCompletion>);
        }
        #[cfg(feature = "reranker")]
        {
            builder = attach_cross_encoder(builder);
        }

        Ok(builder.build())
    }
}

#[cfg(feature = "reranker")]
fn attach_cross_encoder(builder: crate::engine::AnswerEngineBuilder) -> crate::engine::AnswerEngineBuilder {
    match tributary_retrieval::rerank::FastEmbedCrossEncoder::try_new() {
        Ok(encoder) => builder.cross_encoder(Arc::new(encoder)),
        Err(e) => {
            tributary_observability::events::stage_fell_back("cross_encoder", &e);
            builder
        }
    }
}
