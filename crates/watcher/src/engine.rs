//! Snapshot-diff change detector
//!
//! Each poll cycle lists the directory once, compares it with the
//! committed snapshot and the reported-change ledger, emits at most one
//! event per file, and then replaces the snapshot with that same listing.
//!
//! Per-file transitions (snapshot timestamp `T0`, live timestamp `Tn`):
//!
//! | state            | observation                         | event    | next state       |
//! |------------------|-------------------------------------|----------|------------------|
//! | unknown          | listed                              | Created  | tracked          |
//! | tracked          | not listed                          | Deleted  | unknown          |
//! | tracked          | `Tn == T0`                          | -        | tracked          |
//! | tracked          | `Tn != T0`, `Tn` not in ledger      | Modified | tracked+reported |
//! | tracked+reported | `Tn != T0`, `Tn` equals ledger      | -        | tracked+reported |
//!
//! Ledger entries persist until the scheduler's debounce tick calls
//! [`ChangeDetector::clear_ledger`]; refreshing the snapshot leaves the
//! ledger alone.

use crate::debounce::ReportedLedger;
use crate::observer::ChangeObserver;
use crate::status::StatusReport;
use crate::{ChangeEvent, ChangeKind};
use parking_lot::Mutex;
use pw_core::{now_ms, DirectoryLister, MtimeMs, SnapshotDiff, SnapshotStore, WatchError};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State shared by the poll cycle and operator commands
///
/// Snapshot and ledger live behind one mutex so a poll never observes a
/// half-applied commit and vice versa. The lock is only held while a
/// listing is applied, never while the directory is read.
#[derive(Debug, Default)]
struct DetectorState {
    store: SnapshotStore,
    ledger: ReportedLedger,
}

/// Running counters, readable without taking the state lock
#[derive(Debug, Default)]
struct Counters {
    polls_completed: AtomicU64,
    polls_failed: AtomicU64,
    created: AtomicU64,
    modified: AtomicU64,
    deleted: AtomicU64,
    suppressed: AtomicU64,
    observer_failures: AtomicU64,
    ledger_clears: AtomicU64,
    commits: AtomicU64,
    last_poll_ms: AtomicU64,
}

/// Point-in-time copy of the detector's counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectorStats {
    /// Poll cycles that ran to completion
    pub polls_completed: u64,
    /// Poll cycles aborted by a listing failure
    pub polls_failed: u64,
    /// Created events emitted
    pub created: u64,
    /// Modified events emitted
    pub modified: u64,
    /// Deleted events emitted
    pub deleted: u64,
    /// Modifications withheld because the ledger already had them
    pub suppressed: u64,
    /// Events an observer failed to handle
    pub observer_failures: u64,
    /// Debounce ticks that cleared the ledger
    pub ledger_clears: u64,
    /// Snapshot commits (baseline plus operator commits)
    pub commits: u64,
    /// Completion time of the last successful poll (Unix milliseconds)
    pub last_poll_ms: Option<u64>,
}

impl DetectorStats {
    /// Total events emitted
    pub fn events_emitted(&self) -> u64 {
        self.created + self.modified + self.deleted
    }
}

/// Detects created, modified and deleted files in one directory
pub struct ChangeDetector {
    lister: Arc<dyn DirectoryLister>,
    observer: Arc<dyn ChangeObserver>,
    state: Mutex<DetectorState>,
    // Serializes list-then-apply sequences (poll, commit, status)
    cycle: Mutex<()>,
    counters: Counters,
}

impl ChangeDetector {
    /// Create a detector and commit the baseline snapshot
    ///
    /// Files present now are the baseline: the first poll reports nothing
    /// for them unless they change. Fails if the directory cannot be listed.
    pub fn new(
        lister: Arc<dyn DirectoryLister>,
        observer: Arc<dyn ChangeObserver>,
    ) -> Result<Self, WatchError> {
        let detector = Self {
            lister,
            observer,
            state: Mutex::new(DetectorState::default()),
            cycle: Mutex::new(()),
            counters: Counters::default(),
        };

        detector.commit()?;
        Ok(detector)
    }

    /// The watched directory
    pub fn directory(&self) -> &Path {
        self.lister.root()
    }

    /// Replace the snapshot with the directory's current state
    ///
    /// Runs outside the poll schedule. The ledger is not touched.
    /// Returns the number of files committed.
    pub fn commit(&self) -> Result<usize, WatchError> {
        let _cycle = self.cycle.lock();
        let listing = self.lister.list()?;
        let files = listing.len();
        self.state.lock().store.commit(listing);

        self.counters.commits.fetch_add(1, Ordering::Relaxed);
        info!(directory = ?self.directory(), files, "Snapshot committed");

        Ok(files)
    }

    /// Run one poll cycle
    ///
    /// Emits deletions and modifications for known files first, then
    /// creations, and finally replaces the snapshot with the listing the
    /// cycle was computed from. A listing failure aborts the cycle with the
    /// snapshot and ledger untouched. Events are delivered to the observer
    /// after the state lock is released and are also returned.
    ///
    /// A ledger clear may run while the directory is being read; it never
    /// lands between the diff and the snapshot refresh.
    pub fn poll(&self) -> Result<Vec<ChangeEvent>, WatchError> {
        let _cycle = self.cycle.lock();

        let listing = match self.lister.list() {
            Ok(listing) => listing,
            Err(e) => {
                self.counters.polls_failed.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let events = {
            let mut state = self.state.lock();

            let diff = SnapshotDiff::between(state.store.snapshot(), &listing);
            let mut events = Vec::with_capacity(diff.removed.len() + diff.modified.len() + diff.added.len());

            // 1. Known files that vanished
            for name in diff.removed {
                state.ledger.forget(&name);
                events.push(self.event(name, ChangeKind::Deleted, None));
            }

            // 2. Known files whose timestamp moved
            for (name, _old, new) in diff.modified {
                if state.ledger.already_reported(&name, new) {
                    self.counters.suppressed.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                state.ledger.record(&name, new);
                events.push(self.event(name, ChangeKind::Modified, Some(new)));
            }

            // 3. Files not in the snapshot
            for (name, mtime) in diff.added {
                events.push(self.event(name, ChangeKind::Created, Some(mtime)));
            }

            // 4. Refresh the snapshot from the same listing
            state.store.commit(listing);

            events
        };

        self.record_events(&events);
        self.dispatch(&events);

        self.counters.polls_completed.fetch_add(1, Ordering::Relaxed);
        self.counters.last_poll_ms.store(now_ms(), Ordering::Relaxed);
        debug!(events = events.len(), "Poll cycle complete");

        Ok(events)
    }

    /// Drop every ledger entry (the debounce tick)
    ///
    /// Returns how many entries were cleared.
    pub fn clear_ledger(&self) -> usize {
        let cleared = self.state.lock().ledger.clear();
        self.counters.ledger_clears.fetch_add(1, Ordering::Relaxed);
        if cleared > 0 {
            debug!(cleared, "Debounce ledger cleared");
        }
        cleared
    }

    /// Compare the live directory with the committed snapshot
    ///
    /// Read-only: neither the snapshot nor the ledger changes.
    pub fn status_report(&self) -> Result<StatusReport, WatchError> {
        let _cycle = self.cycle.lock();
        let listing = self.lister.list()?;
        let state = self.state.lock();
        Ok(StatusReport::compare(
            self.directory().to_path_buf(),
            state.store.snapshot(),
            &listing,
        ))
    }

    /// Known names in the committed snapshot
    pub fn known_names(&self) -> BTreeSet<String> {
        self.state.lock().store.names()
    }

    /// Committed timestamp for `name`
    pub fn committed_mtime(&self, name: &str) -> Option<MtimeMs> {
        self.state.lock().store.get(name)
    }

    /// Timestamp last reported as Modified for `name`, if still in the ledger
    pub fn reported_mtime(&self, name: &str) -> Option<MtimeMs> {
        self.state.lock().ledger.last_reported(name)
    }

    /// Number of ledger entries awaiting the next debounce tick
    pub fn pending_ledger_entries(&self) -> usize {
        self.state.lock().ledger.len()
    }

    /// Snapshot of the running counters
    pub fn stats(&self) -> DetectorStats {
        let c = &self.counters;
        let last_poll_ms = c.last_poll_ms.load(Ordering::Relaxed);
        DetectorStats {
            polls_completed: c.polls_completed.load(Ordering::Relaxed),
            polls_failed: c.polls_failed.load(Ordering::Relaxed),
            created: c.created.load(Ordering::Relaxed),
            modified: c.modified.load(Ordering::Relaxed),
            deleted: c.deleted.load(Ordering::Relaxed),
            suppressed: c.suppressed.load(Ordering::Relaxed),
            observer_failures: c.observer_failures.load(Ordering::Relaxed),
            ledger_clears: c.ledger_clears.load(Ordering::Relaxed),
            commits: c.commits.load(Ordering::Relaxed),
            last_poll_ms: (last_poll_ms > 0).then_some(last_poll_ms),
        }
    }

    fn event(&self, name: String, kind: ChangeKind, mtime: Option<MtimeMs>) -> ChangeEvent {
        ChangeEvent {
            path: self.directory().join(&name),
            name,
            kind,
            mtime,
        }
    }

    fn record_events(&self, events: &[ChangeEvent]) {
        for event in events {
            let counter = match event.kind {
                ChangeKind::Created => &self.counters.created,
                ChangeKind::Modified => &self.counters.modified,
                ChangeKind::Deleted => &self.counters.deleted,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn dispatch(&self, events: &[ChangeEvent]) {
        for event in events {
            if let Err(e) = self.observer.on_change(event) {
                self.counters.observer_failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, file = %event.name, kind = %event.kind, "Observer failed to handle change");
            }
        }
    }
}

impl std::fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("directory", &self.directory())
            .field("stats", &self.stats())
            .finish()
    }
}
