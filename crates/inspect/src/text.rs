//! Plain-text statistics

use crate::error::AnalyzeError;
use crate::ContentStats;
use std::fs;
use std::path::Path;

/// Count lines, whitespace-separated words and characters
///
/// Characters include the newline between consecutive lines but not a
/// trailing one, and `\r\n` counts as a single separator.
pub fn analyze(path: &Path) -> Result<ContentStats, AnalyzeError> {
    let bytes = fs::read(path)?;
    Ok(count(&String::from_utf8_lossy(&bytes)))
}

pub(crate) fn count(content: &str) -> ContentStats {
    let mut lines = 0usize;
    let mut words = 0usize;
    let mut chars = 0usize;

    for line in content.lines() {
        if lines > 0 {
            chars += 1;
        }
        lines += 1;
        chars += line.chars().count();
        words += line.split_whitespace().count();
    }

    ContentStats::Text { lines, words, chars }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(content: &str) -> (usize, usize, usize) {
        match count(content) {
            ContentStats::Text { lines, words, chars } => (lines, words, chars),
            other => panic!("unexpected stats: {other:?}"),
        }
    }

    #[test]
    fn test_counts() {
        assert_eq!(stats("hello world\nsecond line here\n"), (2, 5, 28));
    }

    #[test]
    fn test_empty() {
        assert_eq!(stats(""), (0, 0, 0));
    }

    #[test]
    fn test_blank_lines_have_no_words() {
        assert_eq!(stats("a\n\n  \nb"), (4, 2, 7));
    }

    #[test]
    fn test_crlf_is_one_separator() {
        assert_eq!(stats("ab\r\ncd"), (2, 2, 5));
    }

    #[test]
    fn test_multibyte_chars() {
        assert_eq!(stats("héllo"), (1, 1, 5));
    }
}
