use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tributary_core::config::RetrievalConfig;
use tributary_core::models::{Modality, RetrievedHit};
use tributary_core::traits::{ILexicalIndex, IModalitySearcher, IRelationalStore};
use tributary_observability::events;

use super::{bounded, into_hits};

/// Term-match search with AND semantics.
///
/// Uses the external full-text backend when configured. When it is absent,
/// or when it fails, the relational full-text engine answers instead.
/// An empty result from a healthy primary is final.
pub struct LexicalSearcher {
    primary: Option<Arc<dyn ILexicalIndex>>,
    fallback: Option<Arc<dyn IRelationalStore>>,
    timeout: Duration,
}

impl LexicalSearcher {
    pub fn new(
        primary: Option<Arc<dyn ILexicalIndex>>,
        fallback: Option<Arc<dyn IRelationalStore>>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            primary,
            fallback,
            timeout: config.search_timeout(),
        }
    }

    async fn search_fallback(&self, query: &str, k: usize) -> Vec<RetrievedHit> {
        let Some(store) = self.fallback.as_deref() else {
            debug!("no relational full-text engine configured");
            return Vec::new();
        };
        match bounded("relational full-text search", self.timeout, store.fulltext_search(query, k)).await {
            Ok(rows) => into_hits(rows, Modality::Lexical, k),
            Err(e) => {
                events::searcher_failed(Modality::Lexical, "relational", &e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl IModalitySearcher for LexicalSearcher {
    fn modality(&self) -> Modality {
        Modality::Lexical
    }

    async fn search(&self, query: &str, k: usize) -> Vec<RetrievedHit> {
        if k == 0 {
            return Vec::new();
        }

        let hits = match self.primary.as_deref() {
            None => self.search_fallback(query, k).await,
            Some(primary) => {
                match bounded("lexical search", self.timeout, primary.term_match(query, k)).await {
                    Ok(rows) => into_hits(rows, Modality::Lexical, k),
                    Err(e) if self.fallback.is_some() => {
                        events::backend_fell_back(Modality::Lexical, "lexical-index", "relational", &e);
                        self.search_fallback(query, k).await
                    }
                    Err(e) => {
                        events::searcher_failed(Modality::Lexical, "lexical-index", &e);
                        Vec::new()
                    }
                }
            }
        };
        debug!(hits = hits.len(), "lexical search complete");
        hits
    }
}
