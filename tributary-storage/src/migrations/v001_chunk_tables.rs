//! v001: document_chunks and chunk_embeddings with indexing status.

use rusqlite::Connection;

use tributary_core::errors::TributaryResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TributaryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS document_chunks (
            id           TEXT PRIMARY KEY,
            document_id  TEXT NOT NULL,
            content      TEXT NOT NULL,
            metadata     TEXT NOT NULL DEFAULT '{}',
            created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_document ON document_chunks(document_id);

        CREATE TABLE IF NOT EXISTS chunk_embeddings (
            chunk_id     TEXT PRIMARY KEY,
            embedding    BLOB NOT NULL,
            dimensions   INTEGER NOT NULL,
            status       TEXT NOT NULL DEFAULT 'pending',
            model_name   TEXT NOT NULL DEFAULT 'unknown',
            updated_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            FOREIGN KEY (chunk_id) REFERENCES document_chunks(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_chunk_embeddings_status ON chunk_embeddings(status);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
