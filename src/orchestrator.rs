//! Main orchestration logic: cached downloads and marker remediation.

use crate::cache::CacheStore;
use crate::download::{copy_file, download_file};
use crate::error::GradleToolError;
use crate::probe::build_client;
use crate::scanner::{scan, MarkerGroup};
use crate::selector::{check_mirrors, select_mirror, MirrorReport};
use crate::types::{DownloadOutcome, DownloadRequest, ToolConfig};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Probes every configured mirror with `config.mirror_check_version`.
pub async fn check_all_mirrors(config: &ToolConfig) -> Result<MirrorReport, GradleToolError> {
    let client = build_client(config.probe_timeout)?;
    Ok(check_mirrors(&client, &config.mirrors, &config.mirror_check_version).await)
}

/// Downloads a Gradle distribution into the cache, given raw user input.
///
/// The edition is validated before anything touches the network or the
/// cache.
///
/// # Example
///
/// ```no_run
/// use mcr_gradletools::{download_gradle, ToolConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ToolConfig::from_env();
/// let outcome = download_gradle(&config, "8.7", "bin").await?;
/// println!("{}", outcome.path().display());
/// # Ok(())
/// # }
/// ```
pub async fn download_gradle(
    config: &ToolConfig,
    version: &str,
    edition: &str,
) -> Result<DownloadOutcome, GradleToolError> {
    let request = DownloadRequest::parse(version, edition)?;
    fetch_distribution(config, &request).await
}

/// Makes sure the cache holds `request`, downloading it if necessary.
///
/// A cache hit returns immediately without probing any mirror. Otherwise the
/// first available mirror for the edition is used.
pub async fn fetch_distribution(
    config: &ToolConfig,
    request: &DownloadRequest,
) -> Result<DownloadOutcome, GradleToolError> {
    let store = CacheStore::new(&config.cache_dir);
    tokio::fs::create_dir_all(store.dir()).await?;

    let path = store.entry_path(request);
    if store.has(request) {
        info!(
            "Gradle {} ({}) is already cached at {}",
            request.version,
            request.edition,
            path.display()
        );
        return Ok(DownloadOutcome::Cached(path));
    }

    let probe_client = build_client(config.probe_timeout)?;
    let mirror = select_mirror(
        &probe_client,
        &config.mirrors,
        &request.version,
        request.edition,
    )
    .await?;

    info!(
        "Downloading Gradle {} ({}) from {}",
        request.version, request.edition, mirror.label
    );
    let download_client = build_client(config.download_timeout)?;
    let bytes = download_file(&download_client, &mirror.url, &path, config.show_progress).await?;

    Ok(DownloadOutcome::Downloaded {
        path,
        mirror: mirror.label,
        bytes,
    })
}

/// Removes a group's marker files. Files that are already gone are fine.
pub fn delete_markers(group: &MarkerGroup) -> Result<(), GradleToolError> {
    for marker in group.marker_files() {
        match std::fs::remove_file(marker) {
            Ok(()) => info!("Deleted: {}", marker.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(GradleToolError::DeleteFailed {
                    path: marker.clone(),
                    source,
                })
            }
        }
    }
    Ok(())
}

/// What a remediation run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemediationSummary {
    /// Archives written into Gradle's distribution directories, in processing order.
    pub installed: Vec<PathBuf>,
}

/// Repairs every stale Gradle download below `root`.
///
/// Scans `root` for marker groups and hands them to [`repair_groups`].
pub async fn process_gradle_dir(
    config: &ToolConfig,
    root: &Path,
) -> Result<RemediationSummary, GradleToolError> {
    info!("🔍 Scanning {}", root.display());
    let groups = scan(root)?;

    if groups.is_empty() {
        info!("No stale Gradle downloads found, nothing to do");
        return Ok(RemediationSummary::default());
    }

    info!("Found {} Gradle distribution(s) to repair", groups.len());
    repair_groups(config, &groups).await
}

/// Repairs the given marker groups in order.
///
/// For each group:
///
/// 1. Deletes the `.lck` / `.part` markers
/// 2. Ensures the distribution is cached (downloading from a mirror if needed)
/// 3. Copies the cached archive into the group's directory as `gradle-X-Y.zip`
///
/// The first failure aborts the run. Steps are not rolled back, so a group
/// whose download fails keeps its markers deleted.
pub async fn repair_groups(
    config: &ToolConfig,
    groups: &[MarkerGroup],
) -> Result<RemediationSummary, GradleToolError> {
    let mut summary = RemediationSummary::default();

    for (index, group) in groups.iter().enumerate() {
        info!(
            "[{}/{}] Gradle {} ({}) in {}",
            index + 1,
            groups.len(),
            group.version,
            group.edition,
            group.target_dir.display()
        );

        delete_markers(group)?;

        let request = group.request();
        let outcome = fetch_distribution(config, &request).await?;

        let target = group.target_dir.join(request.artifact_file_name());
        copy_file(outcome.path(), &target, config.show_progress).await?;
        info!("✅ Installed {}", target.display());

        summary.installed.push(target);
    }

    info!(
        "✅ All Gradle distributions repaired ({} processed)",
        summary.installed.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirrors::{MirrorEntry, MirrorRegistry};
    use crate::types::Edition;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARCHIVE: &[u8] = b"PK\x03\x04 not really a gradle distribution";

    fn test_config(server: &MockServer, cache_dir: &Path) -> ToolConfig {
        let mut entries = Vec::new();
        for name in ["first", "second"] {
            for edition in [Edition::Bin, Edition::All] {
                entries.push(MirrorEntry::new(
                    &format!("{}-{}", name, edition),
                    &format!(
                        "{}/{}/gradle-{{version}}-{}.zip",
                        server.uri(),
                        name,
                        edition
                    ),
                    edition,
                ));
            }
        }

        ToolConfig {
            cache_dir: cache_dir.to_path_buf(),
            gradle_dir: cache_dir.join("unused"),
            mirrors: MirrorRegistry::new(entries),
            probe_timeout: Duration::from_secs(5),
            download_timeout: Duration::from_secs(5),
            mirror_check_version: "8.7".to_string(),
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn test_invalid_edition_makes_no_network_call() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = test_config(&server, dir.path());

        let err = download_gradle(&config, "8.7", "src").await.unwrap_err();

        assert!(matches!(err, GradleToolError::InvalidEdition(e) if e == "src"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = test_config(&server, dir.path());
        fs::write(dir.path().join("8.7-bin.zip"), ARCHIVE).unwrap();

        let outcome = download_gradle(&config, "8.7", "bin").await.unwrap();

        assert_eq!(outcome, DownloadOutcome::Cached(dir.path().join("8.7-bin.zip")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_then_cache_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/first/gradle-8.7-bin.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(ARCHIVE))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(&server, &dir.path().join("cache"));

        let outcome = download_gradle(&config, "8.7", "bin").await.unwrap();
        let cached = dir.path().join("cache").join("8.7-bin.zip");
        assert_eq!(
            outcome,
            DownloadOutcome::Downloaded {
                path: cached.clone(),
                mirror: "first-bin".to_string(),
                bytes: ARCHIVE.len() as u64,
            }
        );
        assert_eq!(fs::read(&cached).unwrap(), ARCHIVE);

        // Probe + download
        let requests_after_first = server.received_requests().await.unwrap().len();
        assert_eq!(requests_after_first, 2);

        let outcome = download_gradle(&config, "8.7", "bin").await.unwrap();
        assert_eq!(outcome, DownloadOutcome::Cached(cached));
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            requests_after_first
        );
    }

    #[tokio::test]
    async fn test_fallback_to_second_mirror() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/first/gradle-8.7-all.zip"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/second/gradle-8.7-all.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(ARCHIVE))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(&server, dir.path());

        let outcome = download_gradle(&config, "8.7", "all").await.unwrap();
        match outcome {
            DownloadOutcome::Downloaded { mirror, .. } => assert_eq!(mirror, "second-all"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_mirror_leaves_cache_empty() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = test_config(&server, dir.path());

        let err = download_gradle(&config, "8.7", "bin").await.unwrap_err();

        assert!(matches!(err, GradleToolError::NoMirrorAvailable { .. }));
        assert!(CacheStore::new(dir.path()).list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_does_not_poison_cache() {
        let server = MockServer::start().await;
        // Probe succeeds, the actual download then fails
        Mock::given(method("GET"))
            .and(path("/first/gradle-8.7-bin.zip"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/first/gradle-8.7-bin.zip"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(&server, dir.path());

        let err = download_gradle(&config, "8.7", "bin").await.unwrap_err();
        assert!(matches!(err, GradleToolError::DownloadFailed { .. }));
        assert!(CacheStore::new(dir.path()).list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_markers_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        let lock = dir.path().join("gradle-8.7-bin.zip.lck");
        fs::write(&lock, b"").unwrap();

        let group = MarkerGroup {
            version: "8.7".to_string(),
            edition: Edition::Bin,
            lock_file: Some(lock.clone()),
            part_file: Some(dir.path().join("gradle-8.7-bin.zip.part")),
            target_dir: dir.path().to_path_buf(),
        };

        delete_markers(&group).unwrap();
        assert!(!lock.exists());
    }

    /// A lock "file" that is really a non-empty directory cannot be removed.
    fn undeletable_group(dir: &Path) -> MarkerGroup {
        let lock = dir.join("gradle-8.7-bin.zip.lck");
        fs::create_dir(&lock).unwrap();
        fs::write(lock.join("keep"), b"").unwrap();
        let part = dir.join("gradle-8.7-bin.zip.part");
        fs::write(&part, b"").unwrap();

        MarkerGroup {
            version: "8.7".to_string(),
            edition: Edition::Bin,
            lock_file: Some(lock),
            part_file: Some(part),
            target_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_delete_markers_stops_on_other_errors() {
        let dir = TempDir::new().unwrap();
        let group = undeletable_group(dir.path());

        let err = delete_markers(&group).unwrap_err();

        match err {
            GradleToolError::DeleteFailed { path, .. } => {
                assert_eq!(Some(path), group.lock_file.clone())
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The part file comes after the lock file and is left alone
        assert!(group.part_file.as_ref().unwrap().exists());
    }

    #[tokio::test]
    async fn test_repair_aborts_before_network_when_markers_stick() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(ARCHIVE))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(&server, &dir.path().join("cache"));
        let stuck = dir.path().join("stuck");
        fs::create_dir(&stuck).unwrap();
        let healthy = dir.path().join("healthy");
        fs::create_dir(&healthy).unwrap();
        let healthy_lock = healthy.join("gradle-8.7-all.zip.lck");
        fs::write(&healthy_lock, b"").unwrap();

        let groups = vec![
            undeletable_group(&stuck),
            MarkerGroup {
                version: "8.7".to_string(),
                edition: Edition::All,
                lock_file: Some(healthy_lock.clone()),
                part_file: None,
                target_dir: healthy.clone(),
            },
        ];

        let err = repair_groups(&config, &groups).await.unwrap_err();

        assert!(matches!(err, GradleToolError::DeleteFailed { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
        // Later groups are never touched
        assert!(healthy_lock.exists());
        assert!(!stuck.join("gradle-8.7-bin.zip").exists());
        assert!(!healthy.join("gradle-8.7-all.zip").exists());
    }

    #[tokio::test]
    async fn test_process_empty_tree_is_a_no_op() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = test_config(&server, &dir.path().join("cache"));
        fs::create_dir(dir.path().join("dists")).unwrap();

        let summary = process_gradle_dir(&config, &dir.path().join("dists"))
            .await
            .unwrap();

        assert!(summary.installed.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_missing_root() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        let config = test_config(&server, dir.path());

        let err = process_gradle_dir(&config, &dir.path().join("dists"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradleToolError::GradleDirNotFound(_)));
    }
}
