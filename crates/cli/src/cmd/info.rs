//! Show file details and content statistics

use crate::util::{format_datetime, format_size};
use anyhow::{Context, Result};
use inspect::{ContentStats, FileInfo};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;

/// One-shot `pw info <DIR> <NAME>`
pub fn run(dir: &Path, name: &str, color: bool) -> Result<()> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Cannot access directory: {}", dir.display()))?;

    let info = inspect::inspect(&dir, name)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render_info(&info, color, &mut out)?;

    Ok(())
}

/// Print metadata followed by content statistics
///
/// An analyzer failure is printed in place of the statistics.
pub fn render_info<W: Write>(info: &FileInfo, color: bool, out: &mut W) -> std::io::Result<()> {
    let label = |text: &'static str| -> String {
        if color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    };

    writeln!(out, "{}: {}", label("File"), info.name)?;
    writeln!(out, "{}: {}", label("Extension"), info.extension)?;
    writeln!(out, "{}: {}", label("Size"), format_size(info.size))?;
    match &info.modified {
        Some(modified) => writeln!(out, "{}: {}", label("Modified"), format_datetime(modified))?,
        None => writeln!(out, "{}: unknown", label("Modified"))?,
    }

    match &info.content {
        Ok(ContentStats::Text { lines, words, chars }) => {
            writeln!(out, "{}: {}", label("Line count"), lines)?;
            writeln!(out, "{}: {}", label("Word count"), words)?;
            writeln!(out, "{}: {}", label("Character count"), chars)?;
        }
        Ok(ContentStats::Source {
            lines,
            classes,
            methods,
            ..
        }) => {
            writeln!(out, "{}: {}", label("Line count"), lines)?;
            writeln!(out, "{}: {}", label("Class count"), classes)?;
            writeln!(out, "{}: {}", label("Method count"), methods)?;
        }
        Ok(ContentStats::Image { width, height }) => {
            writeln!(out, "{}: {}x{}", label("Image Size"), width, height)?;
        }
        Ok(ContentStats::Unsupported { extension }) if extension.is_empty() => {
            writeln!(out, "No content statistics for files without an extension")?;
        }
        Ok(ContentStats::Unsupported { extension }) => {
            writeln!(out, "No content statistics for .{} files (unsupported)", extension)?;
        }
        Err(e) => {
            let message = e.to_string();
            if color {
                writeln!(out, "{}", message.red())?;
            } else {
                writeln!(out, "{}", message)?;
            }
        }
    }

    Ok(())
}
