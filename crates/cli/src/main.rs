//! pollwatch CLI - pw command

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod config;
mod logging;
mod shell;
mod util;

/// pollwatch - poll a directory and report file changes
#[derive(Parser)]
#[command(name = "pw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/pollwatch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a directory and accept commands on stdin
    Watch {
        /// Directory to watch (default: current directory)
        dir: Option<PathBuf>,
        /// Milliseconds between polls (overrides config)
        #[arg(long)]
        poll_interval_ms: Option<u64>,
        /// Milliseconds between debounce clears (overrides config)
        #[arg(long)]
        debounce_ms: Option<u64>,
        /// Print change events as JSON lines
        #[arg(long)]
        events_json: bool,
        /// Disable coloured output
        #[arg(long)]
        no_color: bool,
    },
    /// Show details and content statistics for one file
    Info {
        /// Directory containing the file
        dir: PathBuf,
        /// Bare file name
        name: String,
    },
    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show all configuration values
    List,
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let result = runtime.block_on(run(cli));
    // A stdin read may still be parked on the blocking pool after Ctrl-C
    runtime.shutdown_background();

    result
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Watch {
            dir,
            poll_interval_ms,
            debounce_ms,
            events_json,
            no_color,
        } => {
            let mut config =
                config::load(config_path)?.with_overrides(poll_interval_ms, debounce_ms);
            if no_color {
                config.display.color = false;
            }
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            cmd::watch::run(&dir, &config, events_json).await
        }
        Commands::Info { dir, name } => {
            let config = config::load(config_path)?;
            cmd::info::run(&dir, &name, config.display.color)
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(config_path).await,
            ConfigCommands::Path { create } => cmd::config::run_path(config_path, create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
