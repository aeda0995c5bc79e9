//! Configuration management command
//!
//! Shows the effective configuration, its file location, and an example.

use crate::config::{self, PwConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => config::config_file_path().context("Could not determine config file path"),
    }
}

/// List all configuration values
pub async fn run_list(explicit: Option<&Path>) -> Result<()> {
    let config_path = resolve_path(explicit)?;
    let config: PwConfig = config::load(Some(&config_path))?;

    println!("{}", "Configuration".bold());
    println!(
        "{}: {}{}\n",
        "Location".dimmed(),
        config_path.display().dimmed(),
        if config_path.exists() { "" } else { " (not created, showing defaults)" }
    );

    println!("{}", "[scheduler]".yellow());
    println!(
        "  {} = {} {}",
        "poll_interval_ms".cyan(),
        config.scheduler.poll_interval_ms,
        format!("({:.1}s)", config.scheduler.poll_interval_ms as f64 / 1000.0).dimmed()
    );
    println!(
        "  {} = {} {}",
        "debounce_interval_ms".cyan(),
        config.scheduler.debounce_interval_ms,
        format!("({:.1}s)", config.scheduler.debounce_interval_ms as f64 / 1000.0).dimmed()
    );

    println!("\n{}", "[display]".yellow());
    println!("  {} = {}", "color".cyan(), config.display.color);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  poll_interval_ms: 10-3,600,000");
    println!("  debounce_interval_ms: 10-3,600,000");

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(explicit: Option<&Path>, create: bool) -> Result<()> {
    let config_path = resolve_path(explicit)?;

    if create && config::init_if_missing(&config_path)? {
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}
