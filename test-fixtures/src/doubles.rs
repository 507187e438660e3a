//! Test doubles for every collaborator trait.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tributary_core::errors::{
    EmbeddingError, GenerationError, RerankError, SearchError, StorageError, TributaryResult,
};
use tributary_core::models::{BackendHit, EmbeddingCacheRow, KnnRequest, Modality, RetrievedHit};
use tributary_core::traits::{
    CompletionRequest, ICrossEncoder, IEmbeddingProvider, IEmbeddingStore, ILexicalIndex,
    IModalitySearcher, IRelationalStore, ITextCompletion, IVectorIndex,
};

async fn pause(delay: Option<Duration>) {
    if let Some(d) = delay {
        tokio::time::sleep(d).await;
    }
}

// ── Embeddings ───────────────────────────────────────────────────────────

/// Deterministic embedder that counts how often it is invoked.
pub struct CountingEmbedder {
    dims: usize,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
    /// Length returned instead of `dims`, to simulate a misbehaving model.
    wrong_dims: Option<usize>,
}

impl CountingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay: None,
            wrong_dims: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn returning_dims(mut self, dims: usize) -> Self {
        self.wrong_dims = Some(dims);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(text: &str, dims: usize) -> Vec<f32> {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in text.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (0..dims)
            .map(|i| {
                let mixed = h.wrapping_add((i as u64).wrapping_mul(0x9E3779B97F4A7C15));
                (mixed % 1000) as f32 / 1000.0 + 0.001
            })
            .collect()
    }
}

#[async_trait]
impl IEmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> TributaryResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        Ok(Self::vector_for(text, self.wrong_dims.unwrap_or(self.dims)))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "counting-embedder"
    }
}

/// Embedding store whose every operation fails.
#[derive(Default)]
pub struct FailingEmbeddingStore;

impl IEmbeddingStore for FailingEmbeddingStore {
    fn fetch(&self, _content_hash: &str) -> TributaryResult<Option<EmbeddingCacheRow>> {
        Err(StorageError::SqliteError {
            message: "database is locked".to_string(),
        }
        .into())
    }

    fn touch(&self, _content_hash: &str) -> TributaryResult<()> {
        Err(StorageError::LockPoisoned.into())
    }

    fn upsert(&self, _content_hash: &str, _preview: &str, _embedding: &str) -> TributaryResult<()> {
        Err(StorageError::SqliteError {
            message: "disk I/O error".to_string(),
        }
        .into())
    }

    fn len(&self) -> TributaryResult<usize> {
        Err(StorageError::LockPoisoned.into())
    }
}

// ── Searchers and backends ───────────────────────────────────────────────

/// Searcher returning a fixed list (truncated to `k`).
pub struct StaticSearcher {
    modality: Modality,
    hits: Vec<RetrievedHit>,
    delay: Option<Duration>,
    requested_k: Mutex<Vec<usize>>,
}

impl StaticSearcher {
    pub fn new(modality: Modality, hits: Vec<RetrievedHit>) -> Self {
        Self {
            modality,
            hits,
            delay: None,
            requested_k: Mutex::new(Vec::new()),
        }
    }

    pub fn empty(modality: Modality) -> Self {
        Self::new(modality, Vec::new())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The `k` of every call so far.
    pub fn requested_k(&self) -> Vec<usize> {
        self.requested_k.lock().unwrap().clone()
    }
}

#[async_trait]
impl IModalitySearcher for StaticSearcher {
    fn modality(&self) -> Modality {
        self.modality
    }

    async fn search(&self, _query: &str, k: usize) -> Vec<RetrievedHit> {
        self.requested_k.lock().unwrap().push(k);
        pause(self.delay).await;
        self.hits.iter().take(k).cloned().collect()
    }
}

fn unavailable(backend: &str) -> tributary_core::TributaryError {
    SearchError::BackendUnavailable {
        backend: backend.to_string(),
        reason: "connection refused".to_string(),
    }
    .into()
}

/// Vector index double that records every request.
pub struct StubVectorIndex {
    hits: Vec<BackendHit>,
    fail: bool,
    delay: Option<Duration>,
    requests: Mutex<Vec<KnnRequest>>,
}

impl StubVectorIndex {
    pub fn new(hits: Vec<BackendHit>) -> Self {
        Self {
            hits,
            fail: false,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<KnnRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl IVectorIndex for StubVectorIndex {
    async fn knn(&self, request: KnnRequest) -> TributaryResult<Vec<BackendHit>> {
        let k = request.k;
        self.requests.lock().unwrap().push(request);
        pause(self.delay).await;
        if self.fail {
            return Err(unavailable("stub-vector-index"));
        }
        Ok(self.hits.iter().take(k).cloned().collect())
    }
}

/// Lexical index double that records `(query, k)` per call.
pub struct StubLexicalIndex {
    hits: Vec<BackendHit>,
    fail: bool,
    calls: Mutex<Vec<(String, usize)>>,
}

impl StubLexicalIndex {
    pub fn new(hits: Vec<BackendHit>) -> Self {
        Self {
            hits,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ILexicalIndex for StubLexicalIndex {
    async fn term_match(&self, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
        self.calls.lock().unwrap().push((query.to_string(), k));
        if self.fail {
            return Err(unavailable("stub-lexical-index"));
        }
        Ok(self.hits.iter().take(k).cloned().collect())
    }
}

/// Relational store double with separate vector and full-text results.
pub struct StubRelationalStore {
    vector_hits: Vec<BackendHit>,
    fulltext_hits: Vec<BackendHit>,
    fail: bool,
    vector_calls: AtomicUsize,
    fulltext_calls: AtomicUsize,
}

impl StubRelationalStore {
    pub fn new(vector_hits: Vec<BackendHit>, fulltext_hits: Vec<BackendHit>) -> Self {
        Self {
            vector_hits,
            fulltext_hits,
            fail: false,
            vector_calls: AtomicUsize::new(0),
            fulltext_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    pub fn vector_calls(&self) -> usize {
        self.vector_calls.load(Ordering::SeqCst)
    }

    pub fn fulltext_calls(&self) -> usize {
        self.fulltext_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IRelationalStore for StubRelationalStore {
    async fn vector_search(&self, _vector: &[f32], k: usize) -> TributaryResult<Vec<BackendHit>> {
        self.vector_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unavailable("stub-relational"));
        }
        Ok(self.vector_hits.iter().take(k).cloned().collect())
    }

    async fn fulltext_search(&self, _query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
        self.fulltext_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(unavailable("stub-relational"));
        }
        Ok(self.fulltext_hits.iter().take(k).cloned().collect())
    }
}

// ── Models ───────────────────────────────────────────────────────────────

type PassageScorer = Box<dyn Fn(&str) -> f32 + Send + Sync>;

enum ScoreMode {
    Fixed(Vec<f32>),
    ByPassage(PassageScorer),
    Fail,
}

/// Cross-encoder double.
pub struct FixedCrossEncoder {
    mode: ScoreMode,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FixedCrossEncoder {
    /// Return exactly these scores, whatever the input.
    pub fn with_scores(scores: Vec<f32>) -> Self {
        Self::from_mode(ScoreMode::Fixed(scores))
    }

    /// Score each passage with `f`.
    pub fn scoring<F>(f: F) -> Self
    where
        F: Fn(&str) -> f32 + Send + Sync + 'static,
    {
        Self::from_mode(ScoreMode::ByPassage(Box::new(f)))
    }

    pub fn failing() -> Self {
        Self::from_mode(ScoreMode::Fail)
    }

    fn from_mode(mode: ScoreMode) -> Self {
        Self {
            mode,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ICrossEncoder for FixedCrossEncoder {
    async fn score(&self, _query: &str, passages: &[String]) -> TributaryResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        match &self.mode {
            ScoreMode::Fixed(scores) => Ok(scores.clone()),
            ScoreMode::ByPassage(f) => Ok(passages.iter().map(|p| f(p)).collect()),
            ScoreMode::Fail => Err(RerankError::CrossEncoderFailed {
                reason: "scripted failure".to_string(),
            }
            .into()),
        }
    }

    fn name(&self) -> &str {
        "fixed-cross-encoder"
    }
}

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, String> + Send + Sync>;

enum ReplyMode {
    Queue(Mutex<VecDeque<Result<String, String>>>),
    Respond(Responder),
}

/// Completion double: replays queued replies, or answers via a closure.
/// Every request is recorded.
pub struct ScriptedCompletion {
    mode: ReplyMode,
    delay: Option<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    /// Reply with these strings in order; once exhausted, every call fails.
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = replies.into_iter().map(|r| Ok(r.into())).collect();
        Self::from_mode(ReplyMode::Queue(Mutex::new(queue)))
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self::from_mode(ReplyMode::Queue(Mutex::new(VecDeque::new())))
    }

    /// Decide each reply from the request (`Err` becomes a request failure).
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, String> + Send + Sync + 'static,
    {
        Self::from_mode(ReplyMode::Respond(Box::new(f)))
    }

    fn from_mode(mode: ReplyMode) -> Self {
        Self {
            mode,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ITextCompletion for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> TributaryResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        pause(self.delay).await;
        let reply = match &self.mode {
            ReplyMode::Queue(queue) => queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("no scripted reply left".to_string())),
            ReplyMode::Respond(f) => f(&request),
        };
        reply.map_err(|reason| GenerationError::RequestFailed { reason }.into())
    }
}
