//! # tributary-pipeline
//!
//! The question-answering entry point.
//!
//! ```text
//! AnswerEngine::answer
//! ├── SessionMemory::get            (prior turns)
//! ├── RetrievalEngine::retrieve
//! │   ├── Dense KNN ─┐
//! │   ├── Vector-DB ─┼── weighted RRF ── cross-encoder ── LLM rerank
//! │   └── Lexical ───┘
//! ├── context::assemble             ([Doc N] documents)
//! ├── prompt::build_prompt + ITextCompletion (bounded, fail-open)
//! └── SessionMemory::record         (question, answer)
//! ```
//!
//! [`AnswerEngine::from_config`] is the composition root: it opens the
//! configured backends and wires every collaborator as an `Arc` handle.

pub mod bootstrap;
pub mod context;
pub mod engine;
pub mod prompt;

pub use bootstrap::init_observability;
pub use engine::{AnswerEngine, AnswerEngineBuilder};
