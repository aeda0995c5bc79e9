//! User configuration
//!
//! Stored as TOML at `<config_dir>/pollwatch/config.toml`. A missing file
//! means defaults; CLI flags override whatever the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use watcher::SchedulerConfig;

const MIN_INTERVAL_MS: u64 = 10;
const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwConfig {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub display: DisplaySection,
}

/// `[scheduler]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSection {
    /// Milliseconds between poll cycles
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Milliseconds between debounce ledger clears
    #[serde(default = "default_debounce_interval_ms")]
    pub debounce_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_debounce_interval_ms() -> u64 {
    1_000
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            debounce_interval_ms: default_debounce_interval_ms(),
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySection {
    /// Colour status words in shell output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

impl PwConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        check_interval("scheduler.poll_interval_ms", self.scheduler.poll_interval_ms)?;
        check_interval(
            "scheduler.debounce_interval_ms",
            self.scheduler.debounce_interval_ms,
        )?;
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, poll_interval_ms: Option<u64>, debounce_ms: Option<u64>) -> Self {
        if let Some(ms) = poll_interval_ms {
            self.scheduler.poll_interval_ms = ms;
        }
        if let Some(ms) = debounce_ms {
            self.scheduler.debounce_interval_ms = ms;
        }
        self
    }

    /// Scheduler periods
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_millis(self.scheduler.poll_interval_ms),
            debounce_interval: Duration::from_millis(self.scheduler.debounce_interval_ms),
        }
    }
}

fn check_interval(key: &str, value: u64) -> Result<()> {
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&value) {
        anyhow::bail!(
            "{} must be between {} and {} (got {})",
            key,
            MIN_INTERVAL_MS,
            MAX_INTERVAL_MS,
            value
        );
    }
    Ok(())
}

/// Default config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pollwatch").join("config.toml"))
}

/// Load from `path`, or from the default location when `None`
///
/// A missing file yields defaults. The result is validated.
pub fn load(path: Option<&Path>) -> Result<PwConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Some(path) => path,
            None => return Ok(PwConfig::default()),
        },
    };

    if !path.exists() {
        return Ok(PwConfig::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: PwConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(config)
}

/// Write `config` to `path`, creating parent directories
pub fn save(config: &PwConfig, path: &Path) -> Result<()> {
    config.validate().context("Refusing to save invalid configuration")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

/// Write the defaults to `path` unless a file is already there
///
/// Returns true if a file was created.
pub fn init_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save(&PwConfig::default(), path)?;
    Ok(true)
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# pollwatch configuration

[scheduler]
# Milliseconds between directory polls (10 - 3600000)
poll_interval_ms = 5000
# Milliseconds between debounce ledger clears (10 - 3600000)
debounce_interval_ms = 1000

[display]
# Colour status words in shell output
color = true
"#
}
