//! v003: FTS5 virtual table over chunk content, with sync triggers.

use rusqlite::Connection;

use tributary_core::errors::TributaryResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TributaryResult<()> {
    conn.execute_batch(
        "
        CREATE VIRTUAL TABLE IF NOT EXISTS chunk_fts USING fts5(
            content,
            content='document_chunks',
            content_rowid='rowid'
        );

        CREATE TRIGGER IF NOT EXISTS chunk_fts_insert AFTER INSERT ON document_chunks BEGIN
            INSERT INTO chunk_fts(rowid, content) VALUES (new.rowid, new.content);
        END;

        CREATE TRIGGER IF NOT EXISTS chunk_fts_delete BEFORE DELETE ON document_chunks BEGIN
            INSERT INTO chunk_fts(chunk_fts, rowid, content)
            VALUES ('delete', old.rowid, old.content);
        END;

        CREATE TRIGGER IF NOT EXISTS chunk_fts_update AFTER UPDATE ON document_chunks BEGIN
            INSERT INTO chunk_fts(chunk_fts, rowid, content)
            VALUES ('delete', old.rowid, old.content);
            INSERT INTO chunk_fts(rowid, content) VALUES (new.rowid, new.content);
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
