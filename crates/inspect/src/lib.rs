//! File information and content statistics
//!
//! Looks up a file inside the watched directory, reads its metadata and
//! dispatches on the extension to a content analyzer:
//! - `txt`: lines, words, characters
//! - `java` / `py`: lines, classes, methods
//! - `png` / `jpg` / `jpeg`: width x height
//!
//! Anything else is reported as unsupported.

pub mod error;
pub mod dimensions;
pub mod registry;
pub mod source;
pub mod text;

use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub use error::{AnalyzeError, InspectError, Result};
pub use registry::{Analyzer, AnalyzerRegistry};
pub use source::Language;

/// Content statistics produced by an analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentStats {
    Text {
        lines: usize,
        words: usize,
        chars: usize,
    },
    Source {
        language: Language,
        lines: usize,
        classes: usize,
        methods: usize,
    },
    Image {
        width: u32,
        height: u32,
    },
    /// No analyzer for this extension
    Unsupported { extension: String },
}

/// Everything `info` reports about one file
#[derive(Debug)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    /// Text after the last dot; empty when there is none or it is last
    pub extension: String,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    /// Analyzer outcome; a failure here does not invalidate the metadata
    pub content: Result<ContentStats>,
}

/// Extension of a bare file name
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[idx + 1..],
        _ => "",
    }
}

/// Inspect `name` inside `dir` using the default analyzers
pub fn inspect(dir: &Path, name: &str) -> Result<FileInfo> {
    inspect_with(&AnalyzerRegistry::default(), dir, name)
}

/// Inspect `name` inside `dir` using `registry`
///
/// `name` must be a bare file name; paths that would leave `dir` are
/// rejected.
pub fn inspect_with(registry: &AnalyzerRegistry, dir: &Path, name: &str) -> Result<FileInfo> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InspectError::EmptyName);
    }

    let mut components = Path::new(name).components();
    if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
        return Err(InspectError::InvalidName(name.to_string()));
    }

    let path = dir.join(name);
    let metadata = match std::fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InspectError::NotFound(path));
        }
        Err(source) => return Err(InspectError::Metadata { path, source }),
    };

    let extension = extension_of(name).to_string();
    let content = if metadata.is_dir() {
        Ok(ContentStats::Unsupported {
            extension: extension.clone(),
        })
    } else {
        registry.analyze(&path, &extension)
    };

    if let Err(e) = &content {
        debug!(?path, error = %e, "Content analysis failed");
    }

    Ok(FileInfo {
        name: name.to_string(),
        extension,
        size: metadata.len(),
        modified: metadata.modified().ok().map(DateTime::<Local>::from),
        content,
        path,
    })
}
