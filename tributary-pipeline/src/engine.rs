//! AnswerEngine: one question in, a grounded answer with citations out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, Instrument};
use uuid::Uuid;

use tributary_core::config::TributaryConfig;
use tributary_core::errors::{TributaryError, TributaryResult};
use tributary_core::models::{Answer, ContextDocument, ConversationTurn, Modality, Role};
use tributary_core::traits::{
    CompletionRequest, ICrossEncoder, IEmbeddingProvider, ILexicalIndex, IModalitySearcher,
    IRelationalStore, ITextCompletion, IVectorIndex,
};
use tributary_embeddings::{EmbeddingCache, InMemoryEmbeddingStore};
use tributary_observability::{answer_span, events};
use tributary_retrieval::{
    CrossEncoderStage, DenseKnnSearcher, LexicalSearcher, LlmRerankStage, Reranker,
    RetrievalEngine, VectorDbSearcher,
};
use tributary_session::SessionMemory;

use crate::{context, prompt};

/// The full pipeline. Cheap to share behind an `Arc`; every method takes
/// `&self`.
pub struct AnswerEngine {
    retrieval: RetrievalEngine,
    sessions: Arc<SessionMemory>,
    generator: Option<Arc<dyn ITextCompletion>>,
    generation_timeout: Duration,
}

impl AnswerEngine {
    pub fn builder(config: TributaryConfig) -> AnswerEngineBuilder {
        AnswerEngineBuilder::new(config)
    }

    pub fn sessions(&self) -> &Arc<SessionMemory> {
        &self.sessions
    }

    /// Whether answers will be generated (otherwise only context is returned).
    pub fn generates_answers(&self) -> bool {
        self.generator.is_some()
    }

    /// Answer `question` from retrieved context, continuing `session_id`'s
    /// conversation when one is given.
    ///
    /// Fails only for an empty question. Unavailable backends and models
    /// shrink the context or empty the answer instead.
    pub async fn answer(&self, question: &str, session_id: Option<&str>, k: usize) -> TributaryResult<Answer> {
        let question = validate(question)?;
        let session_id = session_id.filter(|id| !id.is_empty());
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        let answer = async {
            let history = session_id.map(|id| self.sessions.get(id)).unwrap_or_default();
            debug!(turns = history.len(), "loaded conversation history");

            let hits = self.retrieval.retrieve(question, k).await;
            let context = context::assemble(hits);
            let answer = self.generate(question, &history, &context).await;

            if let Some(id) = session_id {
                self.sessions.record(id, Role::User, question);
                if !answer.is_empty() {
                    self.sessions.record(id, Role::Assistant, answer.as_str());
                }
            }

            events::answer_completed(
                &request_id,
                context.len(),
                !answer.is_empty(),
                started.elapsed().as_millis() as u64,
            );

            Answer {
                request_id: request_id.clone(),
                answer,
                citations: context::citations(&context),
                context,
                session_id: session_id.map(str::to_string),
            }
        }
        .instrument(answer_span!(request_id))
        .await;

        Ok(answer)
    }

    /// Final-ranked context for `question`, without generation or history.
    pub async fn retrieve(&self, question: &str, k: usize) -> TributaryResult<Vec<ContextDocument>> {
        let question = validate(question)?;
        Ok(context::assemble(self.retrieval.retrieve(question, k).await))
    }

    /// Append a turn to a session. Empty session ids are ignored.
    pub fn record_history(&self, session_id: &str, role: Role, content: &str) {
        self.sessions.record(session_id, role, content);
    }

    async fn generate(&self, question: &str, history: &[ConversationTurn], context: &[ContextDocument]) -> String {
        let Some(generator) = self.generator.as_deref() else {
            return String::new();
        };

        let request = CompletionRequest::new(prompt::build_prompt(question, history, context));
        match tokio::time::timeout(self.generation_timeout, generator.complete(request)).await {
            Ok(Ok(text)) => text.trim().to_string(),
            Ok(Err(e)) => {
                events::stage_fell_back("generation", &e);
                String::new()
            }
            Err(_) => {
                events::stage_fell_back(
                    "generation",
                    &TributaryError::timeout("generation", self.generation_timeout),
                );
                String::new()
            }
        }
    }
}

fn validate(question: &str) -> TributaryResult<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(TributaryError::InvalidQuery {
            reason: "question is empty".to_string(),
        });
    }
    Ok(trimmed)
}

/// Wires an [`AnswerEngine`] from collaborators. Anything not supplied is
/// absent, and its modality or stage is skipped; the embedder defaults to
/// the configured provider behind an in-memory cache.
pub struct AnswerEngineBuilder {
    config: TributaryConfig,
    vector_index: Option<Arc<dyn IVectorIndex>>,
    lexical_index: Option<Arc<dyn ILexicalIndex>>,
    relational: Option<Arc<dyn IRelationalStore>>,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    cross_encoder: Option<Arc<dyn ICrossEncoder>>,
    completion: Option<Arc<dyn ITextCompletion>>,
    sessions: Option<Arc<SessionMemory>>,
    dense_searcher: Option<Arc<dyn IModalitySearcher>>,
    vector_db_searcher: Option<Arc<dyn IModalitySearcher>>,
    lexical_searcher: Option<Arc<dyn IModalitySearcher>>,
}

impl AnswerEngineBuilder {
    pub fn new(config: TributaryConfig) -> Self {
        Self {
            config,
            vector_index: None,
            lexical_index: None,
            relational: None,
            embedder: None,
            cross_encoder: None,
            completion: None,
            sessions: None,
            dense_searcher: None,
            vector_db_searcher: None,
            lexical_searcher: None,
        }
    }

    pub fn vector_index(mut self, index: Arc<dyn IVectorIndex>) -> Self {
        self.vector_index = Some(index);
        self
    }

    pub fn lexical_index(mut self, index: Arc<dyn ILexicalIndex>) -> Self {
        self.lexical_index = Some(index);
        self
    }

    /// Relational store for vector-db search and the full-text fallback.
    pub fn relational_store(mut self, store: Arc<dyn IRelationalStore>) -> Self {
        self.relational = Some(store);
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn cross_encoder(mut self, encoder: Arc<dyn ICrossEncoder>) -> Self {
        self.cross_encoder = Some(encoder);
        self
    }

    /// Completion client for answer generation and LLM reranking.
    pub fn completion(mut self, completion: Arc<dyn ITextCompletion>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn sessions(mut self, sessions: Arc<SessionMemory>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Replace the searcher for `searcher.modality()` outright.
    pub fn searcher(mut self, searcher: Arc<dyn IModalitySearcher>) -> Self {
        match searcher.modality() {
            Modality::Dense => self.dense_searcher = Some(searcher),
            Modality::VectorDb => self.vector_db_searcher = Some(searcher),
            Modality::Lexical => self.lexical_searcher = Some(searcher),
        }
        self
    }

    pub fn build(self) -> AnswerEngine {
        let config = self.config;
        let embedder: Arc<dyn IEmbeddingProvider> = match self.embedder {
            Some(embedder) => embedder,
            None => Arc::new(EmbeddingCache::new(
                tributary_embeddings::create_provider(&config.embedding),
                Arc::new(InMemoryEmbeddingStore::new()),
                &config.embedding,
            )),
        };

        let dense: Arc<dyn IModalitySearcher> = match self.dense_searcher {
            Some(searcher) => searcher,
            None => Arc::new(DenseKnnSearcher::new(
                self.vector_index,
                embedder.clone(),
                &config.retrieval,
            )),
        };
        let vector_db: Arc<dyn IModalitySearcher> = match self.vector_db_searcher {
            Some(searcher) => searcher,
            None => Arc::new(VectorDbSearcher::new(
                self.relational.clone(),
                embedder,
                &config.retrieval,
            )),
        };
        let lexical: Arc<dyn IModalitySearcher> = match self.lexical_searcher {
            Some(searcher) => searcher,
            None => Arc::new(LexicalSearcher::new(
                self.lexical_index,
                self.relational,
                &config.retrieval,
            )),
        };

        let reranker = Reranker::new(
            CrossEncoderStage::new(self.cross_encoder, config.rerank.cross_encoder_timeout()),
            LlmRerankStage::new(
                self.completion.clone(),
                Some(config.generation.rerank_model.clone()),
                &config.rerank,
            ),
        );

        let generator = if config.generation.answer_enabled {
            self.completion
        } else {
            None
        };

        AnswerEngine {
            retrieval: RetrievalEngine::new(
                dense,
                vector_db,
                lexical,
                reranker,
                config.retrieval.clone(),
                config.rerank.clone(),
            ),
            sessions: self
                .sessions
                .unwrap_or_else(|| Arc::new(SessionMemory::from_config(&config.session))),
            generator,
            generation_timeout: config.generation.timeout(),
        }
    }
}
