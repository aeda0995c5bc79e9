//! Extension -> analyzer lookup

use crate::error::{AnalyzeError, InspectError, Result};
use crate::{dimensions, source, text, ContentStats};
use ahash::AHashMap;
use std::path::Path;
use tracing::debug;

/// Content analyzer for one file type
pub type Analyzer = fn(&Path) -> std::result::Result<ContentStats, AnalyzeError>;

#[derive(Clone, Copy)]
struct Registration {
    /// Used in "Error reading <label> file."
    label: &'static str,
    analyzer: Analyzer,
}

/// Maps lower-cased extensions to analyzers
///
/// Extensions with no registration are reported as
/// [`ContentStats::Unsupported`].
#[derive(Clone)]
pub struct AnalyzerRegistry {
    by_extension: AHashMap<String, Registration>,
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("txt", "text", text::analyze);
        registry.register("java", "Java", source::analyze_java);
        registry.register("py", "Python", source::analyze_python);
        for ext in ["png", "jpg", "jpeg"] {
            registry.register(ext, "image", dimensions::analyze);
        }
        registry
    }
}

impl AnalyzerRegistry {
    /// Registry with no analyzers
    pub fn empty() -> Self {
        Self {
            by_extension: AHashMap::new(),
        }
    }

    /// Register (or replace) the analyzer for `extension`
    pub fn register(&mut self, extension: &str, label: &'static str, analyzer: Analyzer) {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), Registration { label, analyzer });
    }

    /// Check if `extension` has an analyzer (case-insensitive)
    pub fn supports(&self, extension: &str) -> bool {
        self.by_extension.contains_key(&extension.to_ascii_lowercase())
    }

    /// Run the analyzer registered for `extension` against `path`
    pub fn analyze(&self, path: &Path, extension: &str) -> Result<ContentStats> {
        let Some(registration) = self.by_extension.get(&extension.to_ascii_lowercase()) else {
            debug!(?path, extension, "No analyzer registered");
            return Ok(ContentStats::Unsupported {
                extension: extension.to_string(),
            });
        };

        (registration.analyzer)(path).map_err(|source| InspectError::Analyze {
            label: registration.label,
            source,
        })
    }
}
