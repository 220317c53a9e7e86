//! Local cache of downloaded Gradle distributions.

use crate::error::GradleToolError;
use crate::types::DownloadRequest;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// A flat directory of `{version}-{edition}.zip` files.
///
/// Presence of the conventionally named file is the only "already
/// downloaded" signal; nothing else is recorded.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the cache entry for `request`, whether or not it exists.
    pub fn entry_path(&self, request: &DownloadRequest) -> PathBuf {
        self.dir.join(request.cache_file_name())
    }

    pub fn has(&self, request: &DownloadRequest) -> bool {
        self.entry_path(request).is_file()
    }

    /// Names of regular files directly inside the cache directory, sorted.
    ///
    /// A missing directory yields an empty list.
    pub fn list(&self) -> Result<Vec<String>, GradleToolError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Removes every regular file below the cache directory.
    ///
    /// Directories and symlinks are left in place and not counted. Stops at the first file that cannot be removed.
    ///
    /// # Returns
    ///
    /// The number of files removed.
    pub fn clear(&self) -> Result<usize, GradleToolError> {
        if !self.dir.is_dir() {
            return Err(GradleToolError::CacheDirNotFound(self.dir.clone()));
        }

        let mut removed = 0;
        for entry in WalkDir::new(&self.dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            std::fs::remove_file(entry.path()).map_err(|source| GradleToolError::DeleteFailed {
                path: entry.path().to_path_buf(),
                source,
            })?;
            info!("Deleted: {}", entry.file_name().to_string_lossy());
            removed += 1;
        }

        Ok(removed)
    }
}
