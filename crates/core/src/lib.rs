//! Core data model for pollwatch
//!
//! This crate provides:
//! - Snapshot of a directory (file name -> last-modified millis)
//! - Snapshot store with wholesale commit semantics
//! - Directory listing providers (real filesystem and in-memory)
//! - Error taxonomy for listing failures

pub mod error;
pub mod listing;
pub mod memory;
pub mod snapshot;
pub mod store;

// Re-exports
pub use error::{Result, WatchError};
pub use listing::{system_time_to_ms, DirectoryLister, FsLister, Listing, MtimeMs};
pub use memory::MemoryLister;
pub use snapshot::{now_ms, Snapshot, SnapshotDiff};
pub use store::SnapshotStore;
