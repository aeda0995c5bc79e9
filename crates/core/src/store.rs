//! Snapshot store: the last committed state of the watched directory

use crate::listing::{Listing, MtimeMs};
use crate::snapshot::Snapshot;
use std::collections::BTreeSet;

/// Holds the last committed [`Snapshot`]
///
/// The store is plain data. It is replaced wholesale on every commit and
/// never patched entry by entry, so a reader holding `&SnapshotStore`
/// always sees one complete snapshot. Callers that share a store between
/// threads must serialize access themselves (the detector keeps it behind
/// its state mutex).
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Snapshot,
}

impl SnapshotStore {
    /// Create a store holding the empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored snapshot with `listing`
    pub fn commit(&mut self, listing: Listing) {
        self.current = Snapshot::from_listing(listing);
    }

    /// Timestamp recorded for `name` in the last commit
    pub fn get(&self, name: &str) -> Option<MtimeMs> {
        self.current.get(name)
    }

    /// Check whether `name` is a known name
    pub fn contains(&self, name: &str) -> bool {
        self.current.contains(name)
    }

    /// The committed name set, sorted
    pub fn names(&self) -> BTreeSet<String> {
        self.current.names()
    }

    /// The committed snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    /// Number of known names
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Check if nothing has been committed (or the directory was empty)
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
