//! File logging.

use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::paths;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No cache directory available for the log file")]
    NoCacheDir,

    #[error("Failed to create log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

fn ensure_uninitialized() -> Result<(), LoggingError> {
    if log::max_level() != LevelFilter::Off {
        return Err(LoggingError::AlreadyInitialized);
    }
    Ok(())
}

/// Rotate old logs and start writing to `latest.log` in the cache dir.
///
/// Returns the path of the new log file. Nothing is rotated if a logger
/// is already installed.
pub fn init(level: LevelFilter) -> Result<PathBuf, LoggingError> {
    ensure_uninitialized()?;
    paths::rotate_logs();
    let path = paths::log_file().ok_or(LoggingError::NoCacheDir)?;
    init_at(&path, level)?;
    Ok(path)
}

/// Start writing log records to `path`, creating parent directories.
pub fn init_at(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    ensure_uninitialized()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file)
        .map_err(|_| LoggingError::AlreadyInitialized)?;
    log::info!("Logging to {} at {}", path.display(), level);
    Ok(())
}
