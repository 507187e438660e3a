//! Cosine similarity search over chunk embeddings, brute force in Rust.

use rusqlite::{params, Connection};

use tributary_core::constants::INDEXING_STATUS_COMPLETED;
use tributary_core::errors::TributaryResult;
use tributary_core::models::BackendHit;

use crate::to_storage_err;

/// Top-`k` completed chunks by cosine distance ascending. `native_score`
/// is `1 - distance`. Embeddings of a different dimensionality are skipped.
pub fn search_vector(conn: &Connection, query: &[f32], k: usize) -> TributaryResult<Vec<BackendHit>> {
    if query.is_empty() || k == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.document_id, c.content, c.metadata, e.embedding
             FROM chunk_embeddings e
             JOIN document_chunks c ON c.id = e.chunk_id
             WHERE e.status = ?1 AND e.dimensions = ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![INDEXING_STATUS_COMPLETED, query.len() as i64],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Vec<u8>>(4)?,
                ))
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scored: Vec<(f64, BackendHit)> = Vec::new();
    for row in rows {
        let (chunk_id, document_id, content, metadata_json, blob) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let stored = bytes_to_f32_vec(&blob);
        let distance = cosine_distance(query, &stored);
        let metadata = match serde_json::from_str::<serde_json::Value>(&metadata_json) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        scored.push((
            distance,
            BackendHit {
                document_id,
                chunk_id: Some(chunk_id),
                content,
                metadata,
                native_score: 1.0 - distance,
            },
        ));
    }

    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    Ok(scored.into_iter().map(|(_, hit)| hit).collect())
}

/// `1 - cos(a, b)`. A zero vector is at distance 1 from everything.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 1.0;
    }
    1.0 - dot / denom
}

/// Convert f32 slice to little-endian bytes.
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to f32 vec.
pub(crate) fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
