//! Shared test doubles and fixture data for the Tributary workspace.
//!
//! Doubles record how they were called so tests can assert on call counts
//! and request shapes. Fixture JSON lives under `test-fixtures/data/`.

pub mod builders;
pub mod doubles;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

pub use builders::{backend_hit, hit, hits, metadata};
pub use doubles::{
    CountingEmbedder, FailingEmbeddingStore, FixedCrossEncoder, ScriptedCompletion,
    StaticSearcher, StubLexicalIndex, StubRelationalStore, StubVectorIndex,
};

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture under `test-fixtures/data/`.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join("data").join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// One chunk of the sample corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusChunk {
    pub chunk_id: String,
    pub document_id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// The sample corpus used by storage and pipeline integration tests.
pub fn sample_corpus() -> Vec<CorpusChunk> {
    load_fixture("corpus.json")
}
