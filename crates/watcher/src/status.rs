//! Status report: live directory vs. committed snapshot

use pw_core::{Listing, Snapshot, SnapshotDiff};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Status of one file relative to the committed snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Known and its timestamp differs from the snapshot
    Changed,
    /// Known and unchanged
    NoChange,
    /// On disk but not in the snapshot
    NewFile,
    /// In the snapshot but gone from disk
    Deleted,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileStatus::Changed => "Changed",
            FileStatus::NoChange => "No Change",
            FileStatus::NewFile => "New File",
            FileStatus::Deleted => "Deleted",
        };
        f.write_str(label)
    }
}

/// One line of a status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub name: String,
    pub status: FileStatus,
}

/// Read-only comparison of the directory against the committed snapshot
///
/// Entries are ordered: known files (Changed / No Change) by name, then new
/// files by name, then deleted files by name. The report holds no
/// generation time, so two reports over the same state compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Watched directory
    pub directory: PathBuf,
    /// When the compared snapshot was committed (Unix milliseconds)
    pub snapshot_taken_at_ms: u64,
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    /// Build a report from a snapshot and a live listing
    pub fn compare(directory: PathBuf, snapshot: &Snapshot, listing: &Listing) -> Self {
        let diff = SnapshotDiff::between(snapshot, listing);

        let mut known: Vec<StatusEntry> = diff
            .modified
            .into_iter()
            .map(|(name, _, _)| StatusEntry {
                name,
                status: FileStatus::Changed,
            })
            .chain(diff.unchanged.into_iter().map(|name| StatusEntry {
                name,
                status: FileStatus::NoChange,
            }))
            .collect();
        known.sort_by(|a, b| a.name.cmp(&b.name));

        let new_files = diff.added.into_iter().map(|(name, _)| StatusEntry {
            name,
            status: FileStatus::NewFile,
        });
        let deleted = diff.removed.into_iter().map(|name| StatusEntry {
            name,
            status: FileStatus::Deleted,
        });

        let mut entries = known;
        entries.extend(new_files);
        entries.extend(deleted);

        Self {
            directory,
            snapshot_taken_at_ms: snapshot.taken_at_ms(),
            entries,
        }
    }

    /// Entries with the given status
    pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(move |e| e.status == status)
    }

    /// Status of `name`, if it appears in the report
    pub fn status_of(&self, name: &str) -> Option<FileStatus> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.status)
    }

    /// Check if anything differs from the snapshot
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|e| e.status != FileStatus::NoChange)
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} {}", entry.name, entry.status)?;
        }
        Ok(())
    }
}
