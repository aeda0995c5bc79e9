//! End-to-end detection against a real directory

use filetime::{set_file_mtime, FileTime};
use pw_core::FsLister;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use watcher::{
    ChangeDetector, ChangeKind, ChannelObserver, FileStatus, PollScheduler, SchedulerConfig,
};

fn set_mtime_secs(path: &std::path::Path, secs: i64) {
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

fn detector_for(dir: &TempDir) -> (ChangeDetector, tokio::sync::mpsc::UnboundedReceiver<watcher::ChangeEvent>) {
    let lister = Arc::new(FsLister::new(dir.path()).unwrap());
    let (observer, rx) = ChannelObserver::new();
    let detector = ChangeDetector::new(lister, Arc::new(observer)).unwrap();
    (detector, rx)
}

#[test]
fn test_detects_create_modify_delete() {
    let dir = TempDir::new().unwrap();
    let existing = dir.path().join("existing.txt");
    let doomed = dir.path().join("doomed.txt");
    fs::write(&existing, "v1").unwrap();
    fs::write(&doomed, "bye").unwrap();
    set_mtime_secs(&existing, 1_600_000_000);

    let (detector, mut rx) = detector_for(&dir);
    assert!(detector.poll().unwrap().is_empty());

    fs::write(&existing, "v2").unwrap();
    set_mtime_secs(&existing, 1_600_000_100);
    fs::remove_file(&doomed).unwrap();
    fs::write(dir.path().join("fresh.txt"), "hi").unwrap();

    let events = detector.poll().unwrap();
    let mut kinds: Vec<_> = events.iter().map(|e| (e.name.clone(), e.kind)).collect();
    kinds.sort();
    assert_eq!(
        kinds,
        vec![
            ("doomed.txt".to_string(), ChangeKind::Deleted),
            ("existing.txt".to_string(), ChangeKind::Modified),
            ("fresh.txt".to_string(), ChangeKind::Created),
        ]
    );

    // Paths are absolute under the canonical directory
    let root = dir.path().canonicalize().unwrap();
    for event in &events {
        assert_eq!(event.path, root.join(&event.name));
    }

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 3);

    // Nothing new on disk: nothing reported
    assert!(detector.poll().unwrap().is_empty());
}

#[test]
fn test_status_against_real_directory() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "a").unwrap();
    set_mtime_secs(&a, 1_600_000_000);
    fs::write(dir.path().join("b.txt"), "b").unwrap();

    let (detector, _rx) = detector_for(&dir);

    set_mtime_secs(&a, 1_600_000_500);
    fs::remove_file(dir.path().join("b.txt")).unwrap();
    fs::write(dir.path().join("c.txt"), "c").unwrap();

    let report = detector.status_report().unwrap();
    assert_eq!(
        report.to_string(),
        "a.txt Changed\nc.txt New File\nb.txt Deleted\n"
    );

    detector.commit().unwrap();
    let report = detector.status_report().unwrap();
    assert_eq!(report.to_string(), "a.txt No Change\nc.txt No Change\n");
}

#[test]
fn test_subdirectories_are_entries_not_descended() {
    let dir = TempDir::new().unwrap();
    let (detector, _rx) = detector_for(&dir);

    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("inner.txt"), "x").unwrap();

    let events = detector.poll().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "nested");
    assert_eq!(events[0].kind, ChangeKind::Created);
}

#[test]
fn test_removed_directory_fails_poll_without_losing_state() {
    let dir = TempDir::new().unwrap();
    let watched = dir.path().join("watched");
    fs::create_dir(&watched).unwrap();
    fs::write(watched.join("a.txt"), "a").unwrap();

    let lister = Arc::new(FsLister::new(&watched).unwrap());
    let (observer, _rx) = ChannelObserver::new();
    let detector = ChangeDetector::new(lister, Arc::new(observer)).unwrap();

    fs::remove_dir_all(&watched).unwrap();
    assert!(detector.poll().is_err());
    assert!(detector.known_names().contains("a.txt"));
    assert!(detector.status_report().is_err());
}

#[tokio::test]
async fn test_scheduler_reports_changes_on_disk() {
    let dir = TempDir::new().unwrap();
    let (detector, mut rx) = detector_for(&dir);
    let detector = Arc::new(detector);

    let config = SchedulerConfig {
        poll_interval: Duration::from_millis(50),
        debounce_interval: Duration::from_millis(20),
    };
    let handle = PollScheduler::new(detector.clone(), config).unwrap().spawn();

    fs::write(dir.path().join("late.txt"), "x").unwrap();
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.name, "late.txt");
    assert_eq!(event.kind, ChangeKind::Created);

    handle.shutdown().await.unwrap();

    let report = detector.status_report().unwrap();
    assert_eq!(report.status_of("late.txt"), Some(FileStatus::NoChange));
}
