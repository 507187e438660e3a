//! v002: embedding_cache, one row per content hash.

use rusqlite::Connection;

use tributary_core::errors::TributaryResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TributaryResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS embedding_cache (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            content_hash     TEXT NOT NULL UNIQUE,
            content_preview  TEXT NOT NULL DEFAULT '',
            embedding        TEXT NOT NULL,
            usage_count      INTEGER NOT NULL DEFAULT 1,
            last_used        TEXT NOT NULL,
            created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
