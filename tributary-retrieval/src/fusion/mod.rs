//! Weighted reciprocal rank fusion.

mod rrf_fusion;
mod weights;

pub use rrf_fusion::{fuse, ModalityHits};
pub use weights::availability_weights;
