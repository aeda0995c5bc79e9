//! Error types for snapshot and listing operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the watched directory.
///
/// Per-file metadata failures never surface here: a file whose metadata
/// cannot be read is simply left out of the listing.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The directory could not be enumerated
    #[error("Failed to list directory {}: {source}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The watched path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Injected failure from an in-memory lister
    #[error("Listing unavailable: {0}")]
    Unavailable(String),
}

impl WatchError {
    /// Build a listing error for `path`
    pub fn list(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ListDirectory {
            path: path.into(),
            source,
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, WatchError>;
