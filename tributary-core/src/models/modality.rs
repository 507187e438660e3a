use std::fmt;

use serde::{Deserialize, Serialize};

/// The three independent retrieval strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    /// Nearest-neighbor search against the external vector index.
    Dense,
    /// Vector similarity inside the relational store.
    VectorDb,
    /// Term matching (BM25 or relational full-text fallback).
    Lexical,
}

impl Modality {
    /// All modalities in fusion order.
    pub const ALL: [Modality; 3] = [Modality::Dense, Modality::VectorDb, Modality::Lexical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::VectorDb => "vector-db",
            Self::Lexical => "lexical",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which stage last produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitSource {
    Dense,
    VectorDb,
    Lexical,
    Fusion,
    Rerank,
}

impl HitSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dense => "dense",
            Self::VectorDb => "vector-db",
            Self::Lexical => "lexical",
            Self::Fusion => "fusion",
            Self::Rerank => "rerank",
        }
    }
}

impl From<Modality> for HitSource {
    fn from(m: Modality) -> Self {
        match m {
            Modality::Dense => Self::Dense,
            Modality::VectorDb => Self::VectorDb,
            Modality::Lexical => Self::Lexical,
        }
    }
}

impl fmt::Display for HitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
