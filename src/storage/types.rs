use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors opening or migrating the on-disk state database
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of reel appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a sqlx error, recognizing SQLite lock conditions.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all mean
/// someone else holds the file.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

/// Errors raised by a [`KeyValueStore`](super::KeyValueStore) backend.
///
/// Decode failures are not represented here: a malformed stored value is
/// logged and replaced by its default, never surfaced.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite backend rejected the read or write.
    #[error("Storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    /// The value could not be serialized before writing.
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the operation (used by the in-memory store).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
