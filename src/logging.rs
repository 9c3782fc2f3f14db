//! Tracing setup. The TUI owns the terminal so it logs to a file; headless
//! commands log to stderr.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::settings;

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log into `hnfeed.log` under `config_dir`. Keep the guard alive for the
/// lifetime of the program or buffered lines are lost.
pub fn init_file(config_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;
    let path = settings::log_path(config_dir);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter(verbose))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if verbose {
        eprintln!("Logging to {}", path.display());
    }
    Ok(guard)
}

pub fn init_stderr(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(verbose))
        .try_init()
        .context("Failed to install tracing subscriber")
}
