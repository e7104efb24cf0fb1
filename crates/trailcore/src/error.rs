use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the JSON collection store.
///
/// Reads never surface these to the dispatcher: a missing or unreadable
/// collection loads as empty. Writes propagate them so the caller can tell
/// the user to retry.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO errors (directory creation, write, rename)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file exists but does not hold a JSON array of routes
    #[error("Corrupt collection {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of a collection failed
    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
