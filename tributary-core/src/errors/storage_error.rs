/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("blocking store task failed: {reason}")]
    BlockingTaskFailed { reason: String },
}
