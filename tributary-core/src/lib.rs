//! # tributary-core
//!
//! Foundation crate for the Tributary retrieval pipeline.
//! Defines all types, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TributaryConfig;
pub use errors::{TributaryError, TributaryResult};
pub use models::{
    Answer, BackendHit, ContextDocument, ConversationTurn, HitSource, Modality, Provenance, Role,
    RetrievedHit, ScoreKind,
};
