use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use fitness_tracker_cli::commands::Cli;
use fitness_tracker_cli::config::Config;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    init_logging(&cli)?;

    // Initialize tokio runtime
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}

/// Commands log to stderr; the terminal UI owns the screen, so it logs to a
/// file under the config directory instead
fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if cli.is_ui() {
        let dir = Config::config_dir()?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("fitness-tracker.log"))
            .context("Failed to open log file")?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}
