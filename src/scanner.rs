//! Discovery of stale Gradle wrapper downloads.
//!
//! Gradle's wrapper leaves `gradle-X-bin.zip.lck` and `gradle-X-bin.zip.part`
//! next to the archive while downloading. When a download dies these markers
//! stay behind and block every later attempt.

use crate::error::GradleToolError;
use crate::types::{DownloadRequest, Edition};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;
use walkdir::WalkDir;

const LOCK_SUFFIX: &str = ".lck";
const PART_SUFFIX: &str = ".part";

/// Which marker a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Lock,
    Part,
}

impl MarkerKind {
    /// Splits `file_name` into its marker kind and the archive name it guards.
    fn split(file_name: &str) -> Option<(Self, &str)> {
        if let Some(base) = file_name.strip_suffix(LOCK_SUFFIX) {
            Some((MarkerKind::Lock, base))
        } else {
            file_name
                .strip_suffix(PART_SUFFIX)
                .map(|base| (MarkerKind::Part, base))
        }
    }
}

/// Stale markers for one distribution in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerGroup {
    pub version: String,
    pub edition: Edition,
    pub lock_file: Option<PathBuf>,
    pub part_file: Option<PathBuf>,
    /// Directory the markers live in; the fresh archive is copied here.
    pub target_dir: PathBuf,
}

impl MarkerGroup {
    /// The download needed to replace this group's archive.
    pub fn request(&self) -> DownloadRequest {
        DownloadRequest {
            version: self.version.clone(),
            edition: self.edition,
        }
    }

    /// Marker files present in this group.
    pub fn marker_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.lock_file.iter().chain(self.part_file.iter())
    }

    fn record(&mut self, kind: MarkerKind, path: PathBuf) {
        match kind {
            MarkerKind::Lock => self.lock_file = Some(path),
            MarkerKind::Part => self.part_file = Some(path),
        }
    }
}

/// Matches exactly `gradle-<version>-<edition>.zip` with a two- or three-part numeric version.
fn archive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^gradle-(\d+\.\d+(?:\.\d+)?)-(bin|all)\.zip$")
            .expect("archive pattern is a valid regex")
    })
}

/// Extracts version and edition from an archive name such as `gradle-8.14.2-bin.zip`.
pub fn parse_archive_name(name: &str) -> Option<(String, Edition)> {
    let captures = archive_pattern().captures(name)?;
    let version = captures.get(1)?.as_str().to_string();
    let edition = captures.get(2)?.as_str().parse().ok()?;
    Some((version, edition))
}

/// Walks `root` and groups every recognisable marker file.
///
/// Groups are keyed by version, edition and containing directory, and come
/// back in first-seen order. Traversal is lexicographic per directory level.
/// Marker-suffixed files whose base name is not a Gradle archive are skipped.
pub fn scan(root: &Path) -> Result<Vec<MarkerGroup>, GradleToolError> {
    if !root.exists() {
        return Err(GradleToolError::GradleDirNotFound(root.to_path_buf()));
    }

    let mut groups: Vec<MarkerGroup> = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some((kind, base)) = MarkerKind::split(&file_name) else {
            continue;
        };
        let Some((version, edition)) = parse_archive_name(base) else {
            debug!(
                "Skipping {}: '{}' is not a Gradle archive name",
                entry.path().display(),
                base
            );
            continue;
        };

        let target_dir = entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        let path = entry.path().to_path_buf();

        match groups.iter_mut().find(|g| {
            g.version == version && g.edition == edition && g.target_dir == target_dir
        }) {
            Some(group) => group.record(kind, path),
            None => {
                let mut group = MarkerGroup {
                    version,
                    edition,
                    lock_file: None,
                    part_file: None,
                    target_dir,
                };
                group.record(kind, path);
                groups.push(group);
            }
        }
    }

    Ok(groups)
}
