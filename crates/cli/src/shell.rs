//! Interactive operator shell
//!
//! Reads one command per line while the scheduler runs in the background.
//! Commands that touch the directory run on the blocking pool so a slow
//! disk never stalls the prompt task.

use crate::cmd::info::render_info;
use crate::util::{format_absolute_time, format_relative_time, paint_status};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use watcher::{ChangeDetector, DetectorStats, StatusReport};

const INVALID_COMMAND: &str = "Invalid command. Please enter 'commit', 'info', or 'status'.";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Re-commit the snapshot from disk
    Commit,
    /// File details; prompts for the name when absent
    Info(Option<String>),
    /// Compare the directory with the snapshot
    Status { json: bool },
    /// Detector counters
    Stats { json: bool },
    Help,
    Quit,
    /// Blank line
    Empty,
    Unknown(String),
}

impl ShellCommand {
    /// Parse a line; the command word is case-insensitive
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => ShellCommand::Empty,
            "commit" if rest.is_empty() => ShellCommand::Commit,
            "info" if rest.is_empty() => ShellCommand::Info(None),
            "info" => ShellCommand::Info(Some(rest.to_string())),
            "status" if rest.is_empty() => ShellCommand::Status { json: false },
            "status" if rest == "--json" => ShellCommand::Status { json: true },
            "stats" if rest.is_empty() => ShellCommand::Stats { json: false },
            "stats" if rest == "--json" => ShellCommand::Stats { json: true },
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => ShellCommand::Unknown(line.to_string()),
        }
    }
}

/// Whether the shell keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Command interpreter bound to one detector
pub struct Shell {
    detector: Arc<ChangeDetector>,
    color: bool,
}

impl Shell {
    pub fn new(detector: Arc<ChangeDetector>, color: bool) -> Self {
        Self { detector, color }
    }

    /// Read commands from `input` until `quit` or end of input
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await.context("Failed to read command")? else {
                writeln!(out)?;
                break;
            };

            let command = match ShellCommand::parse(&line) {
                ShellCommand::Info(None) => {
                    write!(out, "Enter file name: ")?;
                    out.flush()?;
                    let name = read_name(&mut lines).await?;
                    ShellCommand::Info(Some(name))
                }
                command => command,
            };

            if self.execute(command, out).await? == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Run one command, writing its output to `out`
    ///
    /// Command failures are printed; only output errors are returned.
    pub async fn execute<W: Write>(&self, command: ShellCommand, out: &mut W) -> Result<Flow> {
        match command {
            ShellCommand::Commit => {
                let detector = Arc::clone(&self.detector);
                match tokio::task::spawn_blocking(move || detector.commit()).await? {
                    Ok(_) => writeln!(out, "Snapshot updated.")?,
                    Err(e) => writeln!(out, "Failed to update snapshot: {e}")?,
                }
            }
            ShellCommand::Info(name) => {
                let dir = self.directory();
                let name = name.unwrap_or_default();
                let result =
                    tokio::task::spawn_blocking(move || inspect::inspect(&dir, &name)).await?;
                match result {
                    Ok(info) => render_info(&info, self.color, out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            ShellCommand::Status { json } => {
                let detector = Arc::clone(&self.detector);
                match tokio::task::spawn_blocking(move || detector.status_report()).await? {
                    Ok(report) if json => {
                        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?
                    }
                    Ok(report) => render_status(&report, self.color, out)?,
                    Err(e) => writeln!(out, "Failed to read directory: {e}")?,
                }
            }
            ShellCommand::Stats { json } => {
                let detector = Arc::clone(&self.detector);
                let (stats, pending) = tokio::task::spawn_blocking(move || {
                    (detector.stats(), detector.pending_ledger_entries())
                })
                .await?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
                } else {
                    render_stats(&stats, pending, out)?;
                }
            }
            ShellCommand::Help => write_help(out)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Empty => {}
            ShellCommand::Unknown(_) => writeln!(out, "{INVALID_COMMAND}")?,
        }

        Ok(Flow::Continue)
    }

    fn directory(&self) -> PathBuf {
        self.detector.directory().to_path_buf()
    }
}

/// Read the answer to "Enter file name: "; end of input means no name
async fn read_name<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<String> {
    let line = lines
        .next_line()
        .await
        .context("Failed to read file name")?
        .unwrap_or_default();
    Ok(line.trim().to_string())
}

/// Status report with a snapshot header
pub fn render_status<W: Write>(report: &StatusReport, color: bool, out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "Snapshot at: {}",
        format_absolute_time(report.snapshot_taken_at_ms)
    )?;
    for entry in &report.entries {
        writeln!(out, "{} {}", entry.name, paint_status(entry.status, color))?;
    }
    Ok(())
}

fn render_stats<W: Write>(stats: &DetectorStats, pending: usize, out: &mut W) -> std::io::Result<()> {
    let last_poll = stats
        .last_poll_ms
        .map(format_relative_time)
        .unwrap_or_else(|| "never".to_string());

    writeln!(out, "Polls:      {} completed, {} failed", stats.polls_completed, stats.polls_failed)?;
    writeln!(out, "Last poll:  {}", last_poll)?;
    writeln!(
        out,
        "Events:     {} created, {} modified, {} deleted",
        stats.created, stats.modified, stats.deleted
    )?;
    writeln!(
        out,
        "Debounce:   {} suppressed, {} pending, {} clears",
        stats.suppressed, pending, stats.ledger_clears
    )?;
    writeln!(out, "Commits:    {}", stats.commits)?;
    if stats.observer_failures > 0 {
        writeln!(out, "Observer failures: {}", stats.observer_failures)?;
    }
    Ok(())
}

fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", "Commands:".bold())?;
    writeln!(out, "  commit          Replace the snapshot with the directory's current state")?;
    writeln!(out, "  info [name]     Show details and content statistics for a file")?;
    writeln!(out, "  status [--json] Compare the directory with the snapshot")?;
    writeln!(out, "  stats [--json]  Show detector counters")?;
    writeln!(out, "  help            Show this help")?;
    writeln!(out, "  quit | exit     Stop watching")?;
    Ok(())
}
