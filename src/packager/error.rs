//! Error types for the packaging pipeline.
//!
//! Every fatal condition the pipeline can hit has its own variant with an
//! actionable message; icon-resolution problems are deliberately *not* here
//! because they never abort a build (see [`crate::packager::icon`]).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The isolated Python environment is missing or incomplete.
    #[error(
        "virtual environment not found at {}. Create it with `python -m venv venv` and install the project requirements before packaging",
        .root.join("venv").display()
    )]
    EnvironmentMissing {
        /// Project root that was checked
        root: PathBuf,
    },

    /// Removing a stale build artifact failed during workspace preparation.
    #[error("failed to remove stale artifact {}: {source}", .path.display())]
    WorkspaceCleanup {
        /// Path that could not be removed
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// A subprocess could not be spawned at all.
    #[error("failed to run `{command}`: {source}")]
    CommandFailed {
        /// Command that failed to start
        command: String,
        /// Underlying spawn error
        source: std::io::Error,
    },

    /// The packaging engine ran but reported a non-zero termination code.
    #[error("PyInstaller exited with status {code}. Inspect the engine output above for the failing analysis step")]
    PackagingFailed {
        /// Termination code reported by the engine
        code: i32,
    },

    /// A filesystem operation failed, with the operation and path attached.
    #[error("{op} {}: {source}", .path.display())]
    Fs {
        /// What was being attempted
        op: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// IO errors without more specific context
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for one-off failures
    #[error("{0}")]
    Generic(String),
}

/// Attaches operation and path context to bare IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] with the given context.
    fn fs_context(self, op: &'static str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, op: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            op,
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Adds a human-readable message to `Option` and `Result` values.
pub trait Context<T> {
    /// Replaces the failure with [`Error::Generic`] carrying `msg`.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::Generic(msg.to_string()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::Generic(format!("{msg}: {e}")))
    }
}

/// Returns early with an [`Error::Generic`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::packager::Error::Generic(format!($($arg)*)).into())
    };
}
