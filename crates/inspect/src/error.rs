//! Error types for file inspection

use std::path::PathBuf;
use thiserror::Error;

/// Failures inside a single content analyzer
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors returned when inspecting a file
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Please specify a file name.")]
    EmptyName,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File not found.")]
    NotFound(PathBuf),

    #[error("Failed to read metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An analyzer could not read the file's content
    #[error("Error reading {label} file.")]
    Analyze {
        label: &'static str,
        #[source]
        source: AnalyzeError,
    },
}

pub type Result<T> = std::result::Result<T, InspectError>;
