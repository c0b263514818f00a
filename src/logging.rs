//! File logging
//!
//! The terminal belongs to the UI, so tracing output goes to
//! `~/.pollen-tui/pollen-tui.log`. `RUST_LOG` overrides the default filter.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "pollen-tui.log";
const DEFAULT_FILTER: &str = "pollen_tui=info";

/// Install the global subscriber writing to `log_dir`; returns the log path
pub fn init(log_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        // A subscriber may already be installed by another test; the file is created regardless
        let _ = init(&log_dir);
        assert!(log_dir.join(LOG_FILE).exists());
    }
}
