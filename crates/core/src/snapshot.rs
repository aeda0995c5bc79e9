//! Snapshot representation for a watched directory

use crate::listing::{Listing, MtimeMs};
use ahash::AHashMap;
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// The committed state of a directory at a point in time
///
/// Maps each file name to its last-modified timestamp (epoch millis).
/// Names are unique by construction, and the known-names set is the key
/// set of this map, so the two can never drift apart.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// File name -> last-modified timestamp
    entries: AHashMap<String, MtimeMs>,
    /// When the snapshot was taken (Unix milliseconds, 0 for the empty snapshot)
    taken_at_ms: u64,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot from a directory listing, stamped with the current time
    pub fn from_listing(listing: Listing) -> Self {
        Self {
            entries: listing.into_entries(),
            taken_at_ms: now_ms(),
        }
    }

    /// Get the recorded timestamp for `name`
    pub fn get(&self, name: &str) -> Option<MtimeMs> {
        self.entries.get(name).copied()
    }

    /// Check whether `name` was present when the snapshot was taken
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Known names, sorted
    pub fn names(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate over (name, timestamp) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, MtimeMs)> {
        self.entries.iter().map(|(name, &mtime)| (name.as_str(), mtime))
    }

    /// Number of files in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When this snapshot was taken (Unix milliseconds)
    pub fn taken_at_ms(&self) -> u64 {
        self.taken_at_ms
    }
}

/// Differences between a snapshot and a live listing
///
/// Each list is sorted by name so callers get a deterministic order
/// regardless of how the platform enumerated the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Listed but not in the snapshot
    pub added: Vec<(String, MtimeMs)>,
    /// In the snapshot but no longer listed
    pub removed: Vec<String>,
    /// Present in both with different timestamps: (name, old, new)
    pub modified: Vec<(String, MtimeMs, MtimeMs)>,
    /// Present in both with equal timestamps
    pub unchanged: Vec<String>,
}

impl SnapshotDiff {
    /// Compute the diff between a committed snapshot and a live listing
    pub fn between(snapshot: &Snapshot, listing: &Listing) -> Self {
        let mut diff = Self::default();

        for name in snapshot.names() {
            let Some(old) = snapshot.get(&name) else {
                continue;
            };
            match listing.get(&name) {
                None => diff.removed.push(name),
                Some(new) if new == old => diff.unchanged.push(name),
                Some(new) => diff.modified.push((name, old, new)),
            }
        }

        for (name, mtime) in listing.iter() {
            if !snapshot.contains(name) {
                diff.added.push((name.to_string(), mtime));
            }
        }
        diff.added.sort_by(|a, b| a.0.cmp(&b.0));

        diff
    }

    /// Check if there are any changes
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Current wall-clock time in Unix milliseconds
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
