//! End-to-end tests driving the `pw` binary

mod common;

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Scratch directory with a config file path that never touches the user's
fn workspace() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("watched")).unwrap();
    let config = dir.path().join("config.toml").to_string_lossy().to_string();
    (dir, config)
}

fn watched(dir: &TempDir) -> String {
    dir.path().join("watched").to_string_lossy().to_string()
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_watch_shell_session() -> Result<()> {
    let (dir, config) = workspace();
    let target = watched(&dir);
    write(Path::new(&target), "a.txt", "hello world\n");

    let result = pw!(
        dir.path(),
        "--config", &config,
        "watch", &target,
        "--no-color",
        "--poll-interval-ms", "50",
        "--debounce-ms", "20"
    )
    .stdin("status\ninfo a.txt\nbogus\ncommit\nquit\n")
    .assert_success()?;

    assert!(result.contains_stdout("Watching "));
    assert!(result.contains_stdout("a.txt No Change"));
    assert!(result.contains_stdout("File: a.txt"));
    assert!(result.contains_stdout("Word count: 2"));
    assert!(result.contains_stdout("Invalid command. Please enter 'commit', 'info', or 'status'."));
    assert!(result.contains_stdout("Snapshot updated."));
    assert!(result.duration < Duration::from_secs(20));
    Ok(())
}

#[test]
fn test_watch_ends_at_end_of_input() -> Result<()> {
    let (dir, config) = workspace();
    let target = watched(&dir);

    let result = pw!(dir.path(), "--config", &config, "watch", &target, "--no-color")
        .stdin("status\n")
        .assert_success()?;

    assert!(result.contains_stdout("Snapshot at: "));
    Ok(())
}

#[test]
fn test_watch_info_prompt() -> Result<()> {
    let (dir, config) = workspace();
    let target = watched(&dir);

    let result = pw!(dir.path(), "--config", &config, "watch", &target, "--no-color")
        .stdin("info\n\ninfo\nmissing.txt\nquit\n")
        .assert_success()?;

    assert!(result.contains_stdout("Enter file name: "));
    assert!(result.contains_stdout("Please specify a file name."));
    assert!(result.contains_stdout("File not found."));
    Ok(())
}

#[test]
fn test_watch_rejects_missing_directory() -> Result<()> {
    let (dir, config) = workspace();
    let missing = dir.path().join("nope").to_string_lossy().to_string();

    let result = pw!(dir.path(), "--config", &config, "watch", &missing).assert_failure()?;
    assert!(result.contains_stderr("Cannot watch directory"));
    Ok(())
}

#[test]
fn test_watch_rejects_bad_interval() -> Result<()> {
    let (dir, config) = workspace();
    let target = watched(&dir);

    let result = pw!(
        dir.path(),
        "--config", &config,
        "watch", &target,
        "--poll-interval-ms", "1"
    )
    .assert_failure()?;
    assert!(result.contains_stderr("poll_interval_ms"));
    Ok(())
}

#[test]
fn test_info_one_shot() -> Result<()> {
    let (dir, config) = workspace();
    let target = watched(&dir);
    write(
        Path::new(&target),
        "Main.java",
        "public class Main {\n    public static void main(String[] args) {\n    }\n}\n",
    );

    let result = pw!(dir.path(), "--config", &config, "info", &target, "Main.java")
        .assert_success()?;
    assert!(result.contains_stdout("Extension: java"));
    assert!(result.contains_stdout("Class count: 1"));
    assert!(result.contains_stdout("Method count: 1"));

    let result = pw!(dir.path(), "--config", &config, "info", &target, "ghost.txt")
        .assert_failure()?;
    assert!(result.contains_stderr("File not found."));
    Ok(())
}

#[test]
fn test_config_commands() -> Result<()> {
    let (dir, config) = workspace();

    let result = pw!(dir.path(), "--config", &config, "config", "example").assert_success()?;
    assert!(result.contains_stdout("poll_interval_ms = 5000"));

    let result = pw!(dir.path(), "--config", &config, "config", "path").assert_success()?;
    assert!(result.contains_stdout("File does not exist"));

    pw!(dir.path(), "--config", &config, "config", "path", "--create").assert_success()?;
    assert!(Path::new(&config).exists());

    fs::write(&config, "[scheduler]\npoll_interval_ms = 750\n")?;
    let result = pw!(dir.path(), "--config", &config, "config", "list").assert_success()?;
    assert!(result.contains_stdout("750"));
    Ok(())
}

#[test]
fn test_invalid_config_file_is_reported() -> Result<()> {
    let (dir, config) = workspace();
    let target = watched(&dir);
    fs::write(&config, "[scheduler]\ndebounce_interval_ms = 0\n")?;

    let result = pw!(dir.path(), "--config", &config, "watch", &target).assert_failure()?;
    assert!(result.contains_stderr("debounce_interval_ms"));
    Ok(())
}
