//! Watch a directory: background polling plus the interactive shell

use crate::config::PwConfig;
use crate::shell::Shell;
use crate::util::paint_kind;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use pw_core::FsLister;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;
use watcher::{
    ChangeDetector, ChangeEvent, ChangeObserver, ConsoleObserver, ObserverError, PollScheduler,
};

/// Prints each event as one JSON object per line
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLinesObserver;

impl ChangeObserver for JsonLinesObserver {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ObserverError> {
        let line =
            serde_json::to_string(event).map_err(|e| ObserverError::Failed(e.to_string()))?;
        println!("{}", line);
        Ok(())
    }
}

/// Console line with the change kind coloured
#[derive(Debug, Default, Clone, Copy)]
pub struct PaintedObserver;

impl PaintedObserver {
    fn line(event: &ChangeEvent) -> String {
        format!(
            "{} detected in file: {}",
            paint_kind(event.kind, true),
            event.path.display()
        )
    }
}

impl ChangeObserver for PaintedObserver {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ObserverError> {
        println!("{}", Self::line(event));
        Ok(())
    }
}

fn console_observer(events_json: bool, color: bool) -> Arc<dyn ChangeObserver> {
    match (events_json, color) {
        (true, _) => Arc::new(JsonLinesObserver),
        (false, true) => Arc::new(PaintedObserver),
        (false, false) => Arc::new(ConsoleObserver),
    }
}

pub async fn run(dir: &Path, config: &PwConfig, events_json: bool) -> Result<()> {
    config.validate().context("Invalid scheduler settings")?;

    let lister = FsLister::new(dir)
        .with_context(|| format!("Cannot watch directory: {}", dir.display()))?;
    let observer = console_observer(events_json, config.display.color);

    let detector = Arc::new(
        ChangeDetector::new(Arc::new(lister), observer).context("Failed to take initial snapshot")?,
    );
    let directory = detector.directory().to_path_buf();
    let tracked = detector.known_names().len();

    let scheduler = PollScheduler::new(Arc::clone(&detector), config.scheduler_config())?;
    let handle = scheduler.spawn();

    let banner = format!("Watching {} ({} entries)", directory.display(), tracked);
    if config.display.color {
        println!("{}", banner.bold());
    } else {
        println!("{}", banner);
    }
    println!("Type 'help' for commands.");
    info!(directory = ?directory, tracked, "Watching directory");

    let shell = Shell::new(detector, config.display.color);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    let result = tokio::select! {
        result = shell.run(stdin, &mut stdout) => result,
        signal = tokio::signal::ctrl_c() => {
            println!();
            signal.context("Failed to listen for Ctrl-C")
        }
    };

    handle.shutdown().await.context("Scheduler did not stop cleanly")?;
    result
}
