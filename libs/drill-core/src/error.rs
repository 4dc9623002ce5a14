//! Error types for drill-core.

use thiserror::Error;

use crate::types::WordId;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors that end or prevent a drill session.
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("cannot start a drill session without words")]
    EmptySession,

    #[error("drill session cancelled before completion")]
    Cancelled,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors reported by a Storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("word not found: {0}")]
    NotFound(WordId),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Audio cue playback failure. Never affects session state.
#[derive(Debug, Error)]
#[error("sound effect failed: {0}")]
pub struct EffectError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_converts_into_drill_error() {
        let error: DrillError = StorageError::Backend("disk full".to_string()).into();
        assert_eq!(error.to_string(), "storage error: storage backend failure: disk full");
    }

    #[test]
    fn test_not_found_display() {
        let error = StorageError::NotFound(WordId::from("w-1"));
        assert_eq!(error.to_string(), "word not found: w-1");
    }
}
