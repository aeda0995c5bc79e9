//! Line, class and method counts for Java and Python sources
//!
//! Both analyzers are line heuristics, not parsers: they skip comment
//! blocks and look for declaration keywords at the start of a line.

use crate::error::AnalyzeError;
use crate::ContentStats;
use std::fmt;
use std::fs;
use std::path::Path;

/// Source language recognised by the analyzers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Java,
    Python,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Java => f.write_str("Java"),
            Language::Python => f.write_str("Python"),
        }
    }
}

const JAVA_MODIFIERS: [&str; 6] = ["public", "private", "protected", "static", "abstract", "final"];

pub fn analyze_java(path: &Path) -> Result<ContentStats, AnalyzeError> {
    let bytes = fs::read(path)?;
    Ok(count_java(&String::from_utf8_lossy(&bytes)))
}

pub fn analyze_python(path: &Path) -> Result<ContentStats, AnalyzeError> {
    let bytes = fs::read(path)?;
    Ok(count_python(&String::from_utf8_lossy(&bytes)))
}

pub(crate) fn count_java(content: &str) -> ContentStats {
    let mut lines = 0;
    let mut classes = 0;
    let mut methods = 0;
    let mut in_block_comment = false;

    for line in content.lines() {
        lines += 1;
        let trimmed = line.trim();

        if trimmed.starts_with("/*") {
            in_block_comment = true;
        }
        if in_block_comment {
            if trimmed.ends_with("*/") {
                in_block_comment = false;
            }
            continue;
        }
        if trimmed.starts_with("//") {
            continue;
        }

        let declares_class = line.contains("class ");
        if declares_class {
            classes += 1;
        }
        if !declares_class
            && trimmed.ends_with('{')
            && JAVA_MODIFIERS.iter().any(|m| trimmed.starts_with(m))
        {
            methods += 1;
        }
    }

    ContentStats::Source {
        language: Language::Java,
        lines,
        classes,
        methods,
    }
}

/// Triple-quote delimiter a line toggles, if any
///
/// A line holding both the opening and the closing delimiter is
/// self-contained and toggles nothing.
fn docstring_toggle(line: &str) -> Option<&'static str> {
    ["\"\"\"", "'''"]
        .into_iter()
        .find(|delim| line.matches(delim).count() % 2 == 1)
}

pub(crate) fn count_python(content: &str) -> ContentStats {
    let mut lines = 0;
    let mut classes = 0;
    let mut methods = 0;
    let mut open_docstring: Option<&'static str> = None;

    for line in content.lines() {
        lines += 1;

        if let Some(delim) = open_docstring {
            if line.contains(delim) {
                open_docstring = None;
            }
            continue;
        }
        if line.contains("\"\"\"") || line.contains("'''") {
            open_docstring = docstring_toggle(line);
            continue;
        }

        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if line.contains("class ") {
            classes += 1;
        }
        if trimmed.starts_with("def ") {
            methods += 1;
        }
    }

    ContentStats::Source {
        language: Language::Python,
        lines,
        classes,
        methods,
    }
}
