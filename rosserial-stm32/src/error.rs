//! Error types for rosserial-stm32.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for rosserial-stm32 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting the rosserial library.
#[derive(Debug, Error)]
pub enum Error {
    /// The project has no `Core/Inc` folder
    #[error("Path not existing: {}", .0.display())]
    CoreIncMissing(PathBuf),

    /// The project has no `Core/Src` folder, generated sources stay next to the headers
    #[error("Path not existing: {}\n Source files are not moved", .0.display())]
    SrcMissing(PathBuf),

    /// The bundled runtime library could not be found
    #[error("Runtime library not found: {}", .0.display())]
    RuntimeLibMissing(PathBuf),

    /// A ROS package could not be resolved
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// The output folder from a previous run could not be removed
    #[error("Failed to delete old folder {}: {source}", path.display())]
    StaleOutput {
        /// The stale output folder
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// A message uses a wire type the type map does not declare
    #[error("Unknown wire type: {0}")]
    UnknownWireType(String),

    /// The external message generator exited with a failure
    #[error("Message generator failed during {step}: {status}")]
    GeneratorFailed {
        /// The generator entry point that failed
        step: &'static str,
        /// Exit status of the generator process
        status: ExitStatus,
    },

    /// Filesystem error on a specific path
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// The path being accessed
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an IO error with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
