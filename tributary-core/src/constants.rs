/// Tributary system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smoothing constant for reciprocal rank fusion.
pub const RRF_K: u32 = 60;

/// Maximum characters of source text kept alongside a cached embedding.
pub const CONTENT_PREVIEW_CHARS: usize = 200;

/// Maximum characters of a passage sent to the LLM reranker.
pub const LLM_RERANK_PASSAGE_CHARS: usize = 1_000;

/// Dense-KNN candidate pool multiplier and floor.
pub const KNN_OVERSAMPLE_FACTOR: usize = 5;
pub const KNN_MIN_CANDIDATE_POOL: usize = 50;

/// Indexing status a chunk embedding must carry to be searchable.
pub const INDEXING_STATUS_COMPLETED: &str = "completed";
