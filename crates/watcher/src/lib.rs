//! Poll-based change detection for a single directory
//!
//! This crate provides:
//! - The change detector: snapshot diffing with per-file debounce
//! - A reported-change ledger suppressing duplicate Modified events
//! - Observers that receive change events
//! - Status reports comparing the live directory with the snapshot
//! - A scheduler driving poll and debounce-clear ticks on one worker

pub mod debounce;
pub mod engine;
pub mod observer;
pub mod scheduler;
pub mod status;

use pw_core::MtimeMs;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use debounce::ReportedLedger;
pub use engine::{ChangeDetector, DetectorStats};
pub use observer::{ChangeObserver, ChannelObserver, ConsoleObserver, ObserverError};
pub use scheduler::{PollScheduler, SchedulerConfig, SchedulerError, SchedulerHandle};
pub use status::{FileStatus, StatusEntry, StatusReport};

/// A detected change to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    /// Absolute path of the file inside the watched directory
    pub path: PathBuf,
    /// Bare file name (the snapshot key)
    pub name: String,
    /// Type of change
    pub kind: ChangeKind,
    /// Timestamp observed on disk (None for deletions)
    pub mtime: Option<MtimeMs>,
}

/// Type of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ChangeKind {
    /// File appeared since the last snapshot
    Created,
    /// File timestamp differs from the snapshot
    Modified,
    /// File disappeared since the last snapshot
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Created => "Created",
            ChangeKind::Modified => "Modified",
            ChangeKind::Deleted => "Deleted",
        };
        f.write_str(label)
    }
}
