//! Error types for memtree-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using memtree-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for memtree operations
#[derive(Error, Debug)]
pub enum Error {
    // Path errors
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    // Index errors
    #[error("No index for category '{0}'")]
    IndexNotFound(String),

    #[error("Failed to parse index {path}: {message}")]
    IndexParse { path: PathBuf, message: String },

    #[error("Index {path} failed validation: {message}")]
    IndexValidation { path: PathBuf, message: String },

    #[error("Failed to serialize index for {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    #[error("Index update failed for category '{category}': {source}")]
    Index {
        category: String,
        #[source]
        source: Box<Error>,
    },

    // Memory record errors
    #[error("Memory not found: {0}")]
    MemoryNotFound(String),

    #[error("Malformed memory record {path}: {message}")]
    Record { path: PathBuf, message: String },

    // Registry errors
    #[error("Registry file not found: {0}")]
    RegistryMissing(PathBuf),

    #[error("Failed to parse registry {path}: {message}")]
    RegistryParse { path: PathBuf, message: String },

    #[error("Unknown store: {0}")]
    StoreNotFound(String),

    #[error("Store path for '{name}' must be absolute, got '{path}'")]
    StorePathNotAbsolute { name: String, path: PathBuf },

    // IO errors always carry the offending path
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an IO error tagged with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a path validation error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error that occurred while updating a category's index.
    pub fn index_update(category: impl Into<String>, source: Error) -> Self {
        Self::Index {
            category: category.into(),
            source: Box::new(source),
        }
    }
}
