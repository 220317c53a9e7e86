//! Error types for Gradle download and repair operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, caching or repairing Gradle distributions.
#[derive(Error, Debug)]
pub enum GradleToolError {
    /// I/O error during file operations.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// HTTP client error (client construction, request building).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// Directory traversal error.
    #[error(transparent)]
    WalkError(#[from] walkdir::Error),

    /// A download attempt against a confirmed mirror failed.
    #[error("Download from {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Every mirror eligible for the requested edition failed its probe.
    #[error("No {edition} mirror is available")]
    NoMirrorAvailable { edition: String },

    /// The cache directory does not exist.
    #[error("Cache directory not found: {}", .0.display())]
    CacheDirNotFound(PathBuf),

    /// The Gradle distribution directory to repair does not exist.
    #[error("Gradle directory not found: {}", .0.display())]
    GradleDirNotFound(PathBuf),

    /// Requested edition is neither `bin` nor `all`.
    #[error("Edition must be 'bin' or 'all', got '{0}'")]
    InvalidEdition(String),

    /// Requested version cannot be used in a file name or URL.
    #[error("Invalid Gradle version '{0}'")]
    InvalidVersion(String),

    /// A file could not be removed.
    #[error("Failed to delete {}: {source}", path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
