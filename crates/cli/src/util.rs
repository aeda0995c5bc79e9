//! Shared formatting helpers for CLI output

use chrono::{DateTime, Local, TimeZone};
use owo_colors::OwoColorize;
use watcher::{ChangeKind, FileStatus};

/// Format Unix milliseconds as relative time ("2 minutes ago")
pub fn format_relative_time(ts_ms: u64) -> String {
    let now = Local::now().timestamp_millis();
    let Ok(ts) = i64::try_from(ts_ms) else {
        return "in the future".to_string();
    };
    if ts > now {
        return "in the future".to_string();
    }

    let seconds = (now - ts) / 1000;
    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}

/// Format Unix milliseconds as local time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts_ms: u64) -> String {
    i64::try_from(ts_ms)
        .ok()
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|dt| format_datetime(&dt))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Format a local timestamp ("2024-01-03 14:30:00")
pub fn format_datetime(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Status word, coloured when `color` is set
pub fn paint_status(status: FileStatus, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status {
        FileStatus::Changed => status.yellow().to_string(),
        FileStatus::NoChange => status.dimmed().to_string(),
        FileStatus::NewFile => status.green().to_string(),
        FileStatus::Deleted => status.red().to_string(),
    }
}

/// Change kind, coloured when `color` is set
pub fn paint_kind(kind: ChangeKind, color: bool) -> String {
    if !color {
        return kind.to_string();
    }
    match kind {
        ChangeKind::Created => kind.green().to_string(),
        ChangeKind::Modified => kind.yellow().to_string(),
        ChangeKind::Deleted => kind.red().to_string(),
    }
}
