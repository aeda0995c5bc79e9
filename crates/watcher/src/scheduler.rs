//! Poll and debounce scheduling
//!
//! One background task owns both timers. Poll cycles run on the blocking
//! pool and at most one is in flight; a poll tick that comes due while a
//! cycle is still running is skipped. Debounce ticks are independent of
//! the poll cycle and keep their period however slow the directory is.

use crate::engine::ChangeDetector;
use crate::ChangeEvent;
use pw_core::WatchError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("scheduler task failed: {0}")]
    Join(#[from] JoinError),
}

/// Tick periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time between poll cycles (default: 5 seconds)
    pub poll_interval: Duration,
    /// Time between ledger clears (default: 1 second)
    pub debounce_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            debounce_interval: Duration::from_secs(1),
        }
    }
}

impl SchedulerConfig {
    fn validate(&self) -> Result<(), SchedulerError> {
        if self.poll_interval.is_zero() {
            return Err(SchedulerError::ZeroInterval("poll"));
        }
        if self.debounce_interval.is_zero() {
            return Err(SchedulerError::ZeroInterval("debounce"));
        }
        Ok(())
    }
}

/// Drives a [`ChangeDetector`] on fixed periods
///
/// The first poll fires immediately; the first ledger clear fires one
/// debounce period after start.
pub struct PollScheduler {
    detector: Arc<ChangeDetector>,
    config: SchedulerConfig,
}

impl PollScheduler {
    /// Create a scheduler, rejecting zero periods
    pub fn new(detector: Arc<ChangeDetector>, config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self { detector, config })
    }

    /// Scheduler configuration
    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Start the scheduler on the current tokio runtime
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle { shutdown_tx, task }
    }

    /// Run until `shutdown` flips to true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut poll_timer = interval(self.config.poll_interval);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let first_clear = Instant::now() + self.config.debounce_interval;
        let mut debounce_timer = interval_at(first_clear, self.config.debounce_interval);
        debounce_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            directory = ?self.detector.directory(),
            poll = ?self.config.poll_interval,
            debounce = ?self.config.debounce_interval,
            "Scheduler started"
        );

        let mut in_flight: Option<JoinHandle<PollOutcome>> = None;

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = debounce_timer.tick() => {
                    // Ledger lock is never held across a listing
                    self.detector.clear_ledger();
                }
                outcome = wait_for(&mut in_flight) => {
                    in_flight = None;
                    log_outcome(outcome);
                }
                _ = poll_timer.tick() => {
                    if in_flight.is_some() {
                        debug!("Previous poll still running, skipping tick");
                    } else {
                        let detector = Arc::clone(&self.detector);
                        in_flight = Some(tokio::task::spawn_blocking(move || detector.poll()));
                    }
                }
            }
        }

        if let Some(task) = in_flight {
            log_outcome(task.await);
        }

        info!("Scheduler stopped");
    }
}

type PollOutcome = Result<Vec<ChangeEvent>, WatchError>;

/// Resolve with the in-flight cycle's result, or never when idle
async fn wait_for(task: &mut Option<JoinHandle<PollOutcome>>) -> Result<PollOutcome, JoinError> {
    match task {
        Some(task) => task.await,
        None => std::future::pending().await,
    }
}

fn log_outcome(outcome: Result<PollOutcome, JoinError>) {
    match outcome {
        Ok(Ok(events)) => {
            if !events.is_empty() {
                debug!(events = events.len(), "Changes detected");
            }
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Poll cycle failed, retrying next tick");
        }
        Err(e) => {
            error!(error = %e, "Poll cycle panicked");
        }
    }
}

/// Handle to a running scheduler
pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the scheduler and wait for an in-flight cycle to finish
    pub async fn shutdown(self) -> Result<(), SchedulerError> {
        // Receiver may already be gone if the task ended
        let _ = self.shutdown_tx.send(true);
        self.task.await?;
        Ok(())
    }

    /// Check if the scheduler task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ChannelObserver;
    use crate::ChangeKind;
    use pw_core::{DirectoryLister, Listing, MemoryLister, WatchError};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_config() -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_millis(50),
            debounce_interval: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let lister = Arc::new(MemoryLister::new("/w"));
        let (observer, _rx) = ChannelObserver::new();
        let detector = Arc::new(ChangeDetector::new(lister, Arc::new(observer)).unwrap());

        let config = SchedulerConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            PollScheduler::new(detector.clone(), config),
            Err(SchedulerError::ZeroInterval("poll"))
        ));

        let config = SchedulerConfig {
            debounce_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            PollScheduler::new(detector, config),
            Err(SchedulerError::ZeroInterval("debounce"))
        ));
    }

    #[test]
    fn test_default_periods() {
        let config = SchedulerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.debounce_interval, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_first_poll_runs_immediately() {
        let lister = Arc::new(MemoryLister::new("/w"));
        let (observer, mut rx) = ChannelObserver::new();
        let detector = Arc::new(ChangeDetector::new(lister.clone(), Arc::new(observer)).unwrap());
        lister.set("a.txt", 1);

        // Long poll period: only the immediate first tick can deliver the event
        let config = SchedulerConfig {
            poll_interval: Duration::from_secs(60),
            debounce_interval: Duration::from_secs(60),
        };
        let handle = PollScheduler::new(detector.clone(), config).unwrap().spawn();

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.kind, ChangeKind::Created);
        assert_eq!(event.name, "a.txt");

        handle.shutdown().await.unwrap();
        assert_eq!(detector.stats().polls_completed, 1);
    }

    #[tokio::test]
    async fn test_debounce_ticks_clear_ledger() {
        let lister = Arc::new(MemoryLister::new("/w"));
        lister.set("a.txt", 1);
        let (observer, _rx) = ChannelObserver::new();
        let detector = Arc::new(ChangeDetector::new(lister.clone(), Arc::new(observer)).unwrap());

        let handle = PollScheduler::new(detector.clone(), fast_config()).unwrap().spawn();
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.shutdown().await.unwrap();

        let stats = detector.stats();
        assert!(stats.ledger_clears >= 2, "ledger clears: {}", stats.ledger_clears);
        assert!(stats.polls_completed >= 2, "polls: {}", stats.polls_completed);
    }

    /// Lister that takes a while and records how many calls overlap
    struct SlowLister {
        root: std::path::PathBuf,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    impl DirectoryLister for SlowLister {
        fn list(&self) -> Result<Listing, WatchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Listing::new())
        }

        fn root(&self) -> &Path {
            &self.root
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_cycles_never_overlap() {
        let lister = Arc::new(SlowLister {
            root: "/w".into(),
            delay: Duration::from_millis(80),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        });
        let (observer, _rx) = ChannelObserver::new();
        let detector = Arc::new(ChangeDetector::new(lister.clone(), Arc::new(observer)).unwrap());

        // Poll period shorter than a cycle
        let config = SchedulerConfig {
            poll_interval: Duration::from_millis(10),
            debounce_interval: Duration::from_millis(10),
        };
        let handle = PollScheduler::new(detector.clone(), config).unwrap().spawn();
        tokio::time::sleep(Duration::from_millis(400)).await;
        handle.shutdown().await.unwrap();

        assert_eq!(lister.max_in_flight.load(Ordering::SeqCst), 1);
        // Baseline listing plus at least two cycles
        assert!(lister.calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_cycles_do_not_starve_ledger_clears() {
        let lister = Arc::new(SlowLister {
            root: "/w".into(),
            delay: Duration::from_millis(80),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        });
        let (observer, _rx) = ChannelObserver::new();
        let detector = Arc::new(ChangeDetector::new(lister.clone(), Arc::new(observer)).unwrap());

        let config = SchedulerConfig {
            poll_interval: Duration::from_millis(50),
            debounce_interval: Duration::from_millis(20),
        };
        let handle = PollScheduler::new(detector.clone(), config).unwrap().spawn();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        handle.shutdown().await.unwrap();

        let stats = detector.stats();
        assert_eq!(lister.max_in_flight.load(Ordering::SeqCst), 1);
        // About 50 periods elapsed; polls only managed one per 80ms
        assert!(stats.ledger_clears >= 25, "ledger clears: {}", stats.ledger_clears);
        assert!(
            stats.ledger_clears > stats.polls_completed * 2,
            "clears {} vs polls {}",
            stats.ledger_clears,
            stats.polls_completed
        );
    }

    #[tokio::test]
    async fn test_failed_polls_keep_scheduler_alive() {
        let lister = Arc::new(MemoryLister::new("/w"));
        let (observer, mut rx) = ChannelObserver::new();
        let detector = Arc::new(ChangeDetector::new(lister.clone(), Arc::new(observer)).unwrap());
        lister.fail_with("gone");

        let handle = PollScheduler::new(detector.clone(), fast_config()).unwrap().spawn();
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!handle.is_finished());
        assert!(detector.stats().polls_failed >= 1);

        lister.recover();
        lister.set("back.txt", 1);
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.name, "back.txt");

        handle.shutdown().await.unwrap();
    }
}
