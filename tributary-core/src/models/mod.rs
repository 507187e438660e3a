pub mod answer;
pub mod backend_hit;
pub mod cache_entry;
pub mod hit;
pub mod modality;
pub mod provenance;
pub mod turn;

pub use answer::{Answer, ContextDocument};
pub use backend_hit::{BackendHit, KnnRequest, SimilarityMetric};
pub use cache_entry::{EmbeddingCacheEntry, EmbeddingCacheRow};
pub use hit::{HitKey, RetrievedHit};
pub use modality::{HitSource, Modality};
pub use provenance::{Provenance, ScoreKind};
pub use turn::{ConversationTurn, Role};
