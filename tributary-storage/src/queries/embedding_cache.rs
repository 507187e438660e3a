//! Row-per-hash embedding cache table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use tributary_core::errors::TributaryResult;
use tributary_core::models::EmbeddingCacheRow;

use crate::to_storage_err;

pub fn fetch(conn: &Connection, content_hash: &str) -> TributaryResult<Option<EmbeddingCacheRow>> {
    let row = conn
        .query_row(
            "SELECT content_hash, content_preview, embedding, usage_count, last_used
             FROM embedding_cache WHERE content_hash = ?1",
            params![content_hash],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((content_hash, content_preview, embedding, usage_count, last_used)) = row else {
        return Ok(None);
    };
    let last_used = DateTime::parse_from_rfc3339(&last_used)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad last_used timestamp: {e}")))?;

    Ok(Some(EmbeddingCacheRow {
        content_hash,
        content_preview,
        embedding,
        usage_count: usage_count.max(0) as u64,
        last_used,
    }))
}

/// `usage_count += 1`, `last_used = now`. Unknown hashes are a no-op.
pub fn touch(conn: &Connection, content_hash: &str) -> TributaryResult<()> {
    conn.execute(
        "UPDATE embedding_cache
         SET usage_count = usage_count + 1, last_used = ?2
         WHERE content_hash = ?1",
        params![content_hash, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Insert with `usage_count = 1`, or replace the embedding of an existing
/// row and bump its counters.
pub fn upsert(
    conn: &Connection,
    content_hash: &str,
    preview: &str,
    embedding: &str,
) -> TributaryResult<()> {
    conn.execute(
        "INSERT INTO embedding_cache (content_hash, content_preview, embedding, usage_count, last_used)
         VALUES (?1, ?2, ?3, 1, ?4)
         ON CONFLICT(content_hash) DO UPDATE SET
            content_preview = excluded.content_preview,
            embedding = excluded.embedding,
            usage_count = embedding_cache.usage_count + 1,
            last_used = excluded.last_used",
        params![content_hash, preview, embedding, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn count(conn: &Connection) -> TributaryResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM embedding_cache", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}
