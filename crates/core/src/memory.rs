//! In-memory directory lister
//!
//! Used by tests and benchmarks to drive the detector through exact
//! timestamp sequences without touching the filesystem.

use crate::error::{Result, WatchError};
use crate::listing::{DirectoryLister, Listing, MtimeMs};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// A fake directory whose contents are set programmatically
#[derive(Debug)]
pub struct MemoryLister {
    root: PathBuf,
    files: Mutex<Listing>,
    failure: Mutex<Option<String>>,
    list_calls: AtomicU64,
}

impl MemoryLister {
    /// Create an empty fake directory rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Mutex::new(Listing::new()),
            failure: Mutex::new(None),
            list_calls: AtomicU64::new(0),
        }
    }

    /// Create or touch a file
    pub fn set(&self, name: &str, mtime: MtimeMs) {
        self.files.lock().insert(name, mtime);
    }

    /// Remove a file
    pub fn remove(&self, name: &str) {
        self.files.lock().remove(name);
    }

    /// Make every subsequent `list` fail with `reason` until [`recover`](Self::recover)
    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock() = Some(reason.to_string());
    }

    /// Stop failing
    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// How many times `list` has been called
    pub fn list_calls(&self) -> u64 {
        self.list_calls.load(Ordering::Relaxed)
    }
}

impl DirectoryLister for MemoryLister {
    fn list(&self) -> Result<Listing> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        if let Some(reason) = self.failure.lock().clone() {
            return Err(WatchError::Unavailable(reason));
        }

        Ok(self.files.lock().clone())
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
