//! Tracing subscriber setup.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::level_filters::LevelFilter;

const LOG_FILE: &str = "coursedeck.log";

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::WARN)
}

/// Log to stderr. Used by the non-interactive subcommands.
pub fn init_stderr(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))
}

/// Log to `<dir>/coursedeck.log` so output never lands on the alternate screen.
pub fn init_file(level: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))?;
    Ok(path)
}
