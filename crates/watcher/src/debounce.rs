//! Reported-change ledger
//!
//! Remembers which timestamp was last reported as Modified for each file,
//! so repeated polls that keep seeing the same timestamp stay quiet until
//! the next debounce tick clears the ledger.

use ahash::AHashMap;
use pw_core::MtimeMs;

/// File name -> timestamp last reported as Modified
#[derive(Debug, Default)]
pub struct ReportedLedger {
    reported: AHashMap<String, MtimeMs>,
}

impl ReportedLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `mtime` is exactly what was last reported for `name`
    pub fn already_reported(&self, name: &str, mtime: MtimeMs) -> bool {
        self.reported.get(name) == Some(&mtime)
    }

    /// Record that `mtime` was reported for `name`
    pub fn record(&mut self, name: &str, mtime: MtimeMs) {
        self.reported.insert(name.to_string(), mtime);
    }

    /// Timestamp last reported for `name`
    pub fn last_reported(&self, name: &str) -> Option<MtimeMs> {
        self.reported.get(name).copied()
    }

    /// Forget `name` (after it was reported deleted)
    pub fn forget(&mut self, name: &str) -> Option<MtimeMs> {
        self.reported.remove(name)
    }

    /// Drop every entry, returning how many there were
    pub fn clear(&mut self) -> usize {
        let cleared = self.reported.len();
        self.reported.clear();
        cleared
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.reported.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }
}
