//! Error types for ragchat operations.
//!
//! This module provides the error hierarchy using `thiserror` for document
//! loading, chunking, session persistence, model invocation and CLI commands.
//! Only source availability is recovered locally (by the document store);
//! everything else propagates to the caller.

use thiserror::Error;

/// Result type alias for ragchat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The reference document could not be obtained.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Chunking-related errors (text partitioning).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Session persistence errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Model invocation errors.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Errors raised while obtaining the reference document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The document is missing or unreadable.
    #[error("source unavailable: {source_name}: {reason}")]
    Unavailable {
        /// Human-readable name of the source (usually a path).
        source_name: String,
        /// Why it could not be read.
        reason: String,
    },
}

/// Chunking-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkingError {
    /// Invalid chunk configuration.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// Chunk size exceeds maximum allowed.
    #[error("chunk size {size} exceeds maximum {max}")]
    ChunkTooLarge {
        /// Requested chunk size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// Session persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Storage not initialized (init command not run).
    #[error("session store not initialized. Run: ragchat init")]
    NotInitialized,

    /// A stored role string did not name a known speaker.
    #[error("invalid stored role: {0}")]
    InvalidRole(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors reported by the model-invocation collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The model call failed (transport, quota, timeout, ...).
    #[error("model call failed: {0}")]
    Failed(String),

    /// The model returned no usable text.
    #[error("model returned an empty reply")]
    EmptyReply,
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(StorageError::Serialization(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Unavailable {
            source_name: "data/handbook.txt".to_string(),
            reason: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "source unavailable: data/handbook.txt: file not found"
        );
    }

    #[test]
    fn test_chunking_error_display() {
        let err = ChunkingError::InvalidConfig {
            reason: "chunk_size must be > 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid chunk configuration: chunk_size must be > 0"
        );

        let err = ChunkingError::ChunkTooLarge {
            size: 1000,
            max: 500,
        };
        assert_eq!(err.to_string(), "chunk size 1000 exceeds maximum 500");
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::NotInitialized.to_string(),
            "session store not initialized. Run: ragchat init"
        );
        assert!(
            StorageError::InvalidRole("system".to_string())
                .to_string()
                .contains("system")
        );
    }

    #[test]
    fn test_model_error_display() {
        let err = ModelError::Failed("timeout".to_string());
        assert_eq!(err.to_string(), "model call failed: timeout");
        assert_eq!(
            ModelError::EmptyReply.to_string(),
            "model returned an empty reply"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(IoError::Generic(_))));
    }

    #[test]
    fn test_error_from_source() {
        let err: Error = SourceError::Unavailable {
            source_name: "x".to_string(),
            reason: "y".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Source(_)));
    }

    #[test]
    fn test_error_from_model() {
        let err: Error = ModelError::EmptyReply.into();
        assert!(matches!(err, Error::Model(ModelError::EmptyReply)));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Storage(StorageError::Database(_))));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_error_config() {
        let err = Error::Config {
            message: "top_k must be > 0".to_string(),
        };
        assert_eq!(err.to_string(), "configuration error: top_k must be > 0");
    }
}
