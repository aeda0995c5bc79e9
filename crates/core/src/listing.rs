//! Directory listing providers
//!
//! The detector asks a [`DirectoryLister`] for the current contents of the
//! watched directory once per poll cycle. A listing either succeeds as a
//! whole or fails explicitly; an empty listing always means an empty
//! directory, never an error.

use crate::error::{Result, WatchError};
use ahash::AHashMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Last-modified timestamp in milliseconds since the Unix epoch
///
/// Signed so that files stamped before 1970 still compare correctly.
pub type MtimeMs = i64;

/// One enumeration of a directory: file name -> last-modified timestamp
#[derive(Debug, Clone, Default)]
pub struct Listing {
    entries: AHashMap<String, MtimeMs>,
}

impl Listing {
    /// Create an empty listing
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file
    pub fn insert(&mut self, name: impl Into<String>, mtime: MtimeMs) {
        self.entries.insert(name.into(), mtime);
    }

    /// Drop a file, returning its timestamp if it was listed
    pub fn remove(&mut self, name: &str) -> Option<MtimeMs> {
        self.entries.remove(name)
    }

    /// Timestamp of `name`, or None if it was not listed
    pub fn get(&self, name: &str) -> Option<MtimeMs> {
        self.entries.get(name).copied()
    }

    /// Check whether `name` was listed
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over (name, timestamp) pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, MtimeMs)> {
        self.entries.iter().map(|(name, &mtime)| (name.as_str(), mtime))
    }

    /// Number of listed files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was listed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> AHashMap<String, MtimeMs> {
        self.entries
    }
}

impl FromIterator<(String, MtimeMs)> for Listing {
    fn from_iter<I: IntoIterator<Item = (String, MtimeMs)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Source of directory listings
///
/// Implementations must be shareable with the scheduler's worker.
pub trait DirectoryLister: Send + Sync {
    /// Enumerate the directory
    ///
    /// Fails when the directory itself cannot be read. Entries whose
    /// metadata cannot be read (e.g. deleted between enumeration and stat)
    /// are omitted rather than reported as errors.
    fn list(&self) -> Result<Listing>;

    /// The directory this lister enumerates
    fn root(&self) -> &Path;
}

/// Lists a real directory on disk, one level deep
#[derive(Debug, Clone)]
pub struct FsLister {
    root: PathBuf,
}

impl FsLister {
    /// Create a lister for `root`
    ///
    /// The path is made absolute so that change events carry absolute
    /// file references. Fails if `root` is missing or not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|e| WatchError::list(root, e))?;

        if !root.is_dir() {
            return Err(WatchError::NotADirectory(root));
        }

        Ok(Self { root })
    }
}

impl DirectoryLister for FsLister {
    fn list(&self) -> Result<Listing> {
        // Fail explicitly if the directory vanished or was replaced
        let meta = std::fs::metadata(&self.root).map_err(|e| WatchError::list(&self.root, e))?;
        if !meta.is_dir() {
            return Err(WatchError::NotADirectory(self.root.clone()));
        }

        let mut listing = Listing::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Err(WatchError::list(&self.root, source));
                }
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            // A file removed between enumeration and stat is treated as absent
            let mtime = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
                Some(mtime) => system_time_to_ms(mtime),
                None => {
                    debug!(path = ?entry.path(), "Entry vanished before stat");
                    continue;
                }
            };

            // Lossy names could collide and would not round-trip to a path
            let Some(name) = entry.file_name().to_str() else {
                warn!(path = ?entry.path(), "Skipping entry with non-UTF-8 name");
                continue;
            };
            listing.insert(name.to_owned(), mtime);
        }

        Ok(listing)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

/// Convert a filesystem timestamp to signed epoch milliseconds
pub fn system_time_to_ms(time: SystemTime) -> MtimeMs {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_millis() as MtimeMs,
        Err(before) => -(before.duration().as_millis() as MtimeMs),
    }
}
