//! Connection handling.

pub mod pragmas;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use tributary_core::errors::{StorageError, TributaryResult};

use crate::to_storage_err;
use pragmas::apply_pragmas;

/// A single SQLite connection behind a mutex. Every access is a short,
/// synchronous closure; the lock is never held across an await.
pub struct DbConnection {
    conn: Mutex<Connection>,
}

impl DbConnection {
    /// Open a connection to the given database path.
    pub fn open(path: &Path) -> TributaryResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> TributaryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the lock and run `f` with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> TributaryResult<T>
    where
        F: FnOnce(&Connection) -> TributaryResult<T>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&guard)
    }
}
