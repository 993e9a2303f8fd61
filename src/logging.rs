//! Log file setup
//!
//! The terminal belongs to the TUI, so tracing output goes to a file instead
//! (`~/.cache/countrydir/countrydir.log` on Linux unless overridden). The level
//! filter is read from `RUST_LOG` and defaults to `info`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name inside the cache directory
const LOG_FILE_NAME: &str = "countrydir.log";

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_FILTER: &str = "info";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// No home directory to derive a cache path from, and no explicit path given
    #[error("Could not determine a log file location; pass --log-file")]
    NoLogDir,

    /// Creating the directory or opening the file failed
    #[error("Failed to open log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A global subscriber was already installed
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Default log file location in the XDG cache directory
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "countrydir").map(|dirs| dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Opens `path` for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let io_err = |source| LoggingError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)
}

/// Installs the global tracing subscriber writing to `path` (or the default
/// location) and returns the file actually used
pub fn init(path: Option<PathBuf>) -> Result<PathBuf, LoggingError> {
    let path = path.or_else(default_log_path).ok_or(LoggingError::NoLogDir)?;
    let file = open_log_file(&path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_log_path_names_the_app() {
        if let Some(path) = default_log_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("countrydir"));
            assert!(path.ends_with(LOG_FILE_NAME));
        }
        // Test passes if no home directory is available (e.g., in CI)
    }

    #[test]
    fn test_open_log_file_creates_missing_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("logs").join("app.log");

        let mut file = open_log_file(&path).expect("should open log file");
        writeln!(file, "hello").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("app.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_reports_path_on_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let err = open_log_file(&blocker.join("app.log")).unwrap_err();

        assert!(err.to_string().contains("not-a-dir"));
    }
}
