//! Error handling for the csvsync binary.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for csvsync commands.
pub type Result<T> = result::Result<T, Error>;

/// Errors that end a csvsync command.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration resolution, parsing, or validation failed.
    #[error("{}", .0.pretty())]
    Config(#[from] config::Error),
    /// The sync engine gave up.
    #[error(transparent)]
    Engine(#[from] sync_engine::Error),
    /// The log file could not be opened.
    #[error("Cannot open log file {}: {source}", .path.display())]
    LogFile {
        /// Configured log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Wrapper for other I/O errors (runtime setup, signal handlers).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
