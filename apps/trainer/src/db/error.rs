//! Database error types.

use drill_core::{StorageError, WordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("word not found: {0}")]
    WordNotFound(WordId),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidData(format!("translations: {e}"))
    }
}

impl From<DbError> for StorageError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::WordNotFound(id) => Self::NotFound(id),
            DbError::InvalidData(msg) => Self::InvalidData(msg),
            other => Self::Backend(other.to_string()),
        }
    }
}
