//! Chunk registration: content rows and their embeddings with an indexing
//! status. Only `completed` embeddings are visible to vector search.

use rusqlite::{params, Connection};

use tributary_core::errors::TributaryResult;

use crate::to_storage_err;
use super::vector_search::f32_vec_to_bytes;

/// Insert or replace a chunk's content row.
pub fn insert_chunk(
    conn: &Connection,
    chunk_id: &str,
    document_id: &str,
    content: &str,
    metadata: &serde_json::Map<String, serde_json::Value>,
) -> TributaryResult<()> {
    let metadata_json = serde_json::to_string(metadata)?;
    conn.execute(
        "INSERT INTO document_chunks (id, document_id, content, metadata)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            document_id = excluded.document_id,
            content = excluded.content,
            metadata = excluded.metadata",
        params![chunk_id, document_id, content, metadata_json],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Store an embedding for an existing chunk.
pub fn store_chunk_embedding(
    conn: &Connection,
    chunk_id: &str,
    embedding: &[f32],
    status: &str,
    model_name: &str,
) -> TributaryResult<()> {
    let blob = f32_vec_to_bytes(embedding);
    conn.execute(
        "INSERT INTO chunk_embeddings (chunk_id, embedding, dimensions, status, model_name, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
         ON CONFLICT(chunk_id) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions,
            status = excluded.status,
            model_name = excluded.model_name,
            updated_at = excluded.updated_at",
        params![chunk_id, blob, embedding.len() as i64, status, model_name],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Change the indexing status of a chunk's embedding.
pub fn set_embedding_status(conn: &Connection, chunk_id: &str, status: &str) -> TributaryResult<bool> {
    let changed = conn
        .execute(
            "UPDATE chunk_embeddings SET status = ?2 WHERE chunk_id = ?1",
            params![chunk_id, status],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

/// Delete a chunk and, by cascade, its embedding and FTS entry.
pub fn delete_chunk(conn: &Connection, chunk_id: &str) -> TributaryResult<bool> {
    let changed = conn
        .execute("DELETE FROM document_chunks WHERE id = ?1", params![chunk_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

pub fn count_chunks(conn: &Connection) -> TributaryResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM document_chunks", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}
