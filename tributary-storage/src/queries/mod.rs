//! SQL operations, one module per table family. Every function takes a
//! borrowed connection and is called inside `DbConnection::with_conn`.

pub mod chunk_ops;
pub mod embedding_cache;
pub mod fulltext_search;
pub mod vector_search;

use rusqlite::Row;

use tributary_core::models::BackendHit;

/// Map a `(id, document_id, content, metadata, score)` row to a hit.
pub(crate) fn row_to_hit(row: &Row<'_>) -> rusqlite::Result<BackendHit> {
    let chunk_id: String = row.get(0)?;
    let metadata_json: String = row.get(3)?;
    let metadata = match serde_json::from_str::<serde_json::Value>(&metadata_json) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    Ok(BackendHit {
        document_id: row.get(1)?,
        chunk_id: Some(chunk_id),
        content: row.get(2)?,
        metadata,
        native_score: row.get(4)?,
    })
}
