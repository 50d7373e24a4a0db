//! Log file setup
//!
//! The terminal belongs to the TUI, so log output goes to `swa.log` in the
//! cache directory. The level comes from `RUST_LOG` and defaults to `info`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Name of the log file inside the cache directory
const LOG_FILE: &str = "swa.log";

/// Path of the log file inside `dir`
pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}

/// Opens the log file for appending, creating `dir` if needed
pub fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(dir))
}

/// Installs the global tracing subscriber
///
/// # Returns
/// * `Some(PathBuf)` with the log file location
/// * `None` if there is no cache directory or the file cannot be opened, in
///   which case logging stays disabled
pub fn init() -> Option<PathBuf> {
    let dir = ProjectDirs::from("", "", "swa")?.cache_dir().to_path_buf();
    let file = open_log_file(&dir).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(log_path(&dir))
}
