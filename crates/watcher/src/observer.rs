//! Change observers
//!
//! The detector hands every emitted [`ChangeEvent`] to a single observer.
//! Observer failures are logged by the detector and never interrupt a poll
//! cycle.

use crate::ChangeEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors an observer may report for one event
#[derive(Debug, Error)]
pub enum ObserverError {
    /// The receiving end of a channel observer was dropped
    #[error("observer channel closed")]
    ChannelClosed,

    /// Any other handler failure
    #[error("observer failed: {0}")]
    Failed(String),
}

/// Receives change events from the detector
pub trait ChangeObserver: Send + Sync {
    /// Handle one event
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ObserverError>;
}

/// Prints each event to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl ChangeObserver for ConsoleObserver {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ObserverError> {
        println!("{} detected in file: {}", event.kind, event.path.display());
        Ok(())
    }
}

/// Forwards events into a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiver its events arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ChangeObserver for ChannelObserver {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ObserverError> {
        self.tx
            .send(event.clone())
            .map_err(|_| ObserverError::ChannelClosed)
    }
}
