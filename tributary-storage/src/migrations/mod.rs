//! Versioned schema migrations, applied in order inside one transaction each.

mod v001_chunk_tables;
mod v002_embedding_cache;
mod v003_fts5_index;

use rusqlite::{params, Connection};

use tributary_core::errors::{StorageError, TributaryResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> TributaryResult<()>;

const MIGRATIONS: [(u32, Migration); 3] = [
    (1, v001_chunk_tables::migrate),
    (2, v002_embedding_cache::migrate),
    (3, v003_fts5_index::migrate),
];

/// Latest schema version.
pub const LATEST_VERSION: u32 = 3;

/// Bring the database up to [`LATEST_VERSION`]. Already-applied
/// migrations are skipped.
pub fn run_migrations(conn: &Connection) -> TributaryResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS.iter() {
        if *version <= current {
            continue;
        }
        apply(conn, *version, *migrate).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        tracing::debug!(version, "applied migration");
    }
    Ok(LATEST_VERSION)
}

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> TributaryResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn apply(conn: &Connection, version: u32, migrate: Migration) -> TributaryResult<()> {
    conn.execute_batch("BEGIN")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let result = migrate(conn).and_then(|()| {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map(|_| ())
        .map_err(|e| to_storage_err(e.to_string()))
    });
    match result {
        Ok(()) => conn
            .execute_batch("COMMIT")
            .map_err(|e| to_storage_err(e.to_string())),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
