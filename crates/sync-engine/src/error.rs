use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the sync engine.
pub type Result<T> = StdResult<T, Error>;

/// Errors that abort a whole sync cycle.
///
/// Per-source failures (bad colors, missing media, rejected updates) never
/// surface here; they are logged and folded into the pass outcome.
#[derive(Debug, Error)]
pub enum Error {
    /// The data file is missing, empty, or malformed. The cycle is skipped
    /// and retried on the next poll.
    #[error("Cannot read {}: {message}", .path.display())]
    SourceUnreadable {
        /// Data file path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Every startup connect attempt failed.
    #[error("Could not connect to the remote endpoint after {attempts} attempt(s)")]
    ConnectFailed {
        /// Attempts made.
        attempts: u32,
    },
}

impl Error {
    /// Build a `SourceUnreadable` for `path`.
    pub(crate) fn unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }
}
