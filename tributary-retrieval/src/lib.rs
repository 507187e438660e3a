//! # tributary-retrieval
//!
//! Hybrid retrieval: three modality searchers run concurrently, their rank
//! orders are merged by weighted reciprocal rank fusion, and the fused list
//! is refined by a cross-encoder stage and an optional LLM stage.
//!
//! Every searcher and rerank stage fails open. A broken backend costs its
//! modality, a broken model costs its stage, and the request carries on.

pub mod completion;
pub mod engine;
pub mod fusion;
pub mod rerank;
pub mod search;

pub use completion::ChatCompletionClient;
pub use engine::RetrievalEngine;
pub use fusion::{availability_weights, fuse, ModalityHits};
pub use rerank::{CrossEncoderStage, LlmRerankStage, Reranker};
pub use search::{DenseKnnSearcher, ElasticClient, LexicalSearcher, VectorDbSearcher};
