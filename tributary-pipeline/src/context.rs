//! Final hits to numbered context documents.

use serde_json::json;

use tributary_core::models::{ContextDocument, RetrievedHit};

/// Number the hits from 1 and stamp each document's metadata with where
/// it came from: `source`, `score`, `doc_id` and `chunk_id`.
pub fn assemble(hits: Vec<RetrievedHit>) -> Vec<ContextDocument> {
    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let mut doc = ContextDocument::from_hit(i + 1, hit);
            doc.metadata.insert("source".to_string(), json!(doc.source.as_str()));
            doc.metadata.insert("score".to_string(), json!(doc.score));
            doc.metadata.insert("doc_id".to_string(), json!(doc.document_id));
            doc.metadata.insert("chunk_id".to_string(), json!(doc.chunk_id));
            doc
        })
        .collect()
}

/// Document ids in rank order.
pub fn citations(context: &[ContextDocument]) -> Vec<String> {
    context.iter().map(|doc| doc.document_id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::hit;
    use tributary_core::models::Modality;

    #[test]
    fn numbers_and_stamps_metadata() {
        let docs = assemble(vec![
            hit("alpha", Modality::Dense, 0.9),
            hit("beta", Modality::Lexical, 4.5),
        ]);

        assert_eq!(docs[0].label(), "[Doc 1]");
        assert_eq!(docs[1].rank, 2);
        assert_eq!(docs[0].metadata["title"], "alpha");
        assert_eq!(docs[0].metadata["source"], "dense");
        assert_eq!(docs[1].metadata["score"], 4.5);
        assert_eq!(docs[1].metadata["doc_id"], "beta");
        assert!(docs[1].metadata["chunk_id"].is_null());
        assert_eq!(citations(&docs), vec!["alpha", "beta"]);
    }
}
