use std::io;
use std::path::Path;
use thiserror::Error;

/// Custom error type for the tnsed application
#[derive(Error, Debug)]
pub enum TnsedError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot access '{path}': {source}")]
    FileAccess { path: String, source: io::Error },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the tnsed application
pub type Result<T> = std::result::Result<T, TnsedError>;

impl TnsedError {
    /// Create a file access error carrying the offending path
    pub fn file_access(path: &Path, source: io::Error) -> Self {
        TnsedError::FileAccess {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        TnsedError::Config(msg.into())
    }

    /// Create an invalid entry error
    pub fn invalid_entry<S: Into<String>>(msg: S) -> Self {
        TnsedError::InvalidEntry(msg.into())
    }

    /// Create an entry not found error
    pub fn entry_not_found<S: Into<String>>(msg: S) -> Self {
        TnsedError::EntryNotFound(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TnsedError::Other(msg.into())
    }
}
