//! Tracing setup. The terminal belongs to ratatui, so events go to a file and
//! never to stdout or stderr.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber appending to `log_file`. Calling this twice is
/// an error.
pub fn init(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_log_directory_and_writes_events() {
        let dir = tempdir().unwrap();
        let log_file = dir.path().join("logs").join("reading-log.log");

        init(&log_file).unwrap();
        tracing::error!("log file check");

        assert!(log_file.parent().unwrap().is_dir());
        let written = fs::read_to_string(&log_file).unwrap();
        assert!(written.contains("log file check"));
        assert!(init(&log_file).is_err());
    }

    #[test]
    fn unusable_log_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = init(&blocker.join("reading-log.log")).unwrap_err();
        assert!(err.to_string().contains("log directory"));
    }
}
