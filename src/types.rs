//! Data structures shared across the download pipeline.

use crate::error::GradleToolError;
use crate::mirrors::MirrorRegistry;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Gradle distribution edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edition {
    /// Binaries only (`gradle-X-bin.zip`).
    Bin,
    /// Binaries, sources and documentation (`gradle-X-all.zip`).
    All,
}

impl Edition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edition::Bin => "bin",
            Edition::All => "all",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edition {
    type Err = GradleToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" => Ok(Edition::Bin),
            "all" => Ok(Edition::All),
            other => Err(GradleToolError::InvalidEdition(other.to_string())),
        }
    }
}

/// A validated request for one Gradle distribution.
///
/// The version is opaque: it is never parsed as semver, only substituted
/// into mirror URLs and file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub version: String,
    pub edition: Edition,
}

impl DownloadRequest {
    /// Builds a request from an already-typed edition.
    pub fn new(version: &str, edition: Edition) -> Result<Self, GradleToolError> {
        let invalid = version.is_empty()
            || version.contains("..")
            || version
                .chars()
                .any(|c| c == '/' || c == '\\' || c.is_whitespace());
        if invalid {
            return Err(GradleToolError::InvalidVersion(version.to_string()));
        }

        Ok(Self {
            version: version.to_string(),
            edition,
        })
    }

    /// Builds a request from user input, rejecting unknown editions.
    pub fn parse(version: &str, edition: &str) -> Result<Self, GradleToolError> {
        let edition = edition.parse::<Edition>()?;
        Self::new(version, edition)
    }

    /// Name of the cache entry: `{version}-{edition}.zip`.
    pub fn cache_file_name(&self) -> String {
        format!("{}-{}.zip", self.version, self.edition)
    }

    /// Name Gradle's wrapper expects: `gradle-{version}-{edition}.zip`.
    pub fn artifact_file_name(&self) -> String {
        format!("gradle-{}-{}.zip", self.version, self.edition)
    }
}

/// Result of a successful [`download_gradle`](crate::download_gradle) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The cache already held the artifact; no network call was made.
    Cached(PathBuf),
    /// The artifact was fetched from `mirror`.
    Downloaded {
        path: PathBuf,
        mirror: String,
        bytes: u64,
    },
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            DownloadOutcome::Cached(path) => path,
            DownloadOutcome::Downloaded { path, .. } => path,
        }
    }
}

/// Runtime configuration, built once at program entry.
///
/// # Example
///
/// ```
/// use mcr_gradletools::ToolConfig;
/// use std::path::PathBuf;
///
/// let config = ToolConfig {
///     cache_dir: PathBuf::from("/tmp/gradle-cache"),
///     show_progress: false,
///     ..ToolConfig::default()
/// };
/// assert_eq!(config.probe_timeout.as_secs(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Directory holding `{version}-{edition}.zip` cache entries.
    pub cache_dir: PathBuf,
    /// Default root scanned for stale marker files (MCreator's wrapper dists).
    pub gradle_dir: PathBuf,
    /// Ordered mirror list; order encodes priority.
    pub mirrors: MirrorRegistry,
    /// Timeout for a single availability probe (default: 10s).
    pub probe_timeout: Duration,
    /// Timeout for a full archive download (default: 300s).
    pub download_timeout: Duration,
    /// Version used by the mirror health check (default: `"8.7"`).
    pub mirror_check_version: String,
    /// Draw progress bars on stderr.
    pub show_progress: bool,
}

impl ToolConfig {
    /// Resolves paths relative to the current user's home directory.
    ///
    /// Without a resolvable home directory both paths degrade to locations
    /// relative to the working directory.
    pub fn from_env() -> Self {
        let home = dirs::home_dir();

        let cache_dir = match &home {
            Some(home) => home.join(".mcrgradletool").join("cache"),
            None => PathBuf::from(".").join("cache"),
        };
        let gradle_dir = home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mcreator")
            .join("gradle")
            .join("wrapper")
            .join("dists");

        Self {
            cache_dir,
            gradle_dir,
            mirrors: MirrorRegistry::default(),
            probe_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(300),
            mirror_check_version: "8.7".to_string(),
            show_progress: atty::is(atty::Stream::Stderr),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
