//! Cache error handling
//!
//! Provides typed errors for local cache operations with descriptive messages
//! and recovery suggestions.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create the directory holding the cache database
    #[error("Failed to create cache directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be decoded
    #[error("Cached record '{key}' is corrupted: {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage
    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Every attempt of an operation failed
    #[error("Cache {operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: Box<CacheError>,
    },
}

impl CacheError {
    /// The error from the final attempt, looking through retry wrappers
    pub fn root(&self) -> &CacheError {
        match self {
            CacheError::RetriesExhausted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self.root() {
            CacheError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            CacheError::CorruptRecord { .. } => {
                Some("Delete the cache database; it is rebuilt from the remote store on the next load.")
            }
            _ => None,
        }
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn corrupt() -> CacheError {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        CacheError::CorruptRecord {
            key: "art-1".to_string(),
            source,
        }
    }

    #[test]
    fn test_root_unwraps_retries() {
        let err = CacheError::RetriesExhausted {
            operation: "load_articles",
            attempts: 4,
            source: Box::new(corrupt()),
        };
        assert!(matches!(err.root(), CacheError::CorruptRecord { .. }));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_error_display() {
        let err = CacheError::RetriesExhausted {
            operation: "save_articles",
            attempts: 4,
            source: Box::new(corrupt()),
        };
        let msg = err.to_string();
        assert!(msg.contains("save_articles"));
        assert!(msg.contains("4 attempts"));
    }

    #[test]
    fn test_create_directory_suggestion() {
        let err = CacheError::CreateDirectory {
            path: PathBuf::from("/readonly/guru"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/readonly/guru"));
        assert!(err.recovery_suggestion().is_some());
    }
}
