//! Error types for the movie-merge-core library.
//!
//! Per-event errors (empty events, normalization and concatenation failures)
//! are caught at the job boundary by the orchestrator; only discovery-level
//! failures and missing external dependencies abort a whole run.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for movie-merge
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Discovery failed for {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("No eligible clips found in {0}")]
    EmptyEvent(PathBuf),

    #[error("Normalization failed for clip {clip}: {message}")]
    Normalization { clip: PathBuf, message: String },

    #[error("Concatenation failed for {output}: {message}")]
    Concatenation { output: PathBuf, message: String },

    #[error("External dependency '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Error waiting for command '{0}': {1}")]
    CommandWait(String, #[source] std::io::Error),

    #[error("ffprobe output parse error: {0}")]
    FfprobeParse(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Result type for movie-merge-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CoreError::CommandStart` with consistent naming.
pub(crate) fn command_start_error(
    cmd: impl Into<String>,
    err: std::io::Error,
) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CoreError::CommandFailed` with consistent naming.
pub(crate) fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a `CoreError::CommandWait` with consistent naming.
pub(crate) fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}
