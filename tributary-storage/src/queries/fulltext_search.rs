//! FTS5 full-text search over chunk content.
//!
//! Every query term is required. The score is `-bm25(...)`, so higher is
//! more relevant and results come back rank descending.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::{params, Connection};

use tributary_core::errors::TributaryResult;
use tributary_core::models::BackendHit;

use super::row_to_hit;
use crate::to_storage_err;

static TERM: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}_]+").ok());

/// Build an FTS5 MATCH expression: each word quoted, implicitly ANDed.
/// Returns `None` when the query has no searchable terms.
pub fn to_match_expression(query: &str) -> Option<String> {
    let pattern = TERM.as_ref()?;
    let terms: Vec<String> = pattern
        .find_iter(query)
        .map(|m| format!("\"{}\"", m.as_str()))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

pub fn search_fulltext(conn: &Connection, query: &str, k: usize) -> TributaryResult<Vec<BackendHit>> {
    let Some(expression) = to_match_expression(query) else {
        return Ok(Vec::new());
    };
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.document_id, c.content, c.metadata, -bm25(chunk_fts) AS score
             FROM chunk_fts
             JOIN document_chunks c ON c.rowid = chunk_fts.rowid
             WHERE chunk_fts MATCH ?1
             ORDER BY score DESC
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![expression, k as i64], row_to_hit)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
