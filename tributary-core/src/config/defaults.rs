// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashing";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_EMBEDDING_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_EMBEDDING_MAX_RETRIES: u32 = 3;

// --- Retrieval ---
pub const DEFAULT_K: usize = 12;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_WEIGHT_DENSE: f64 = 0.40;
pub const DEFAULT_WEIGHT_VECTOR_DB: f64 = 0.30;
pub const DEFAULT_WEIGHT_LEXICAL: f64 = 0.30;
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 10_000;

// --- Rerank ---
pub const DEFAULT_RERANK_TOP_K: usize = 10;
pub const DEFAULT_FINAL_TOP_K: usize = 6;
pub const DEFAULT_CROSS_ENCODER_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LLM_RERANK_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_LLM_RERANK_ENABLED: bool = true;

// --- Generation ---
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_RERANK_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_ANSWER_ENABLED: bool = true;

// --- Session ---
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3_600; // 1 hour

// --- Backends ---
pub const DEFAULT_ELASTICSEARCH_INDEX: &str = "document_chunks";
pub const DEFAULT_ELASTICSEARCH_TIMEOUT_MS: u64 = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
