//! Collaborator seams. Network-facing traits are async (`async_trait`) so
//! they can be held as `Arc<dyn ...>`; local stores are synchronous.

mod backends;
mod completion;
mod cross_encoder;
mod embedding;
mod embedding_store;
mod searcher;

pub use backends::{ILexicalIndex, IRelationalStore, IVectorIndex};
pub use completion::{CompletionRequest, ITextCompletion};
pub use cross_encoder::ICrossEncoder;
pub use embedding::IEmbeddingProvider;
pub use embedding_store::IEmbeddingStore;
pub use searcher::IModalitySearcher;
