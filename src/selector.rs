//! Ordered mirror fallback and mirror health reporting.

use crate::error::GradleToolError;
use crate::mirrors::MirrorRegistry;
use crate::probe::probe_mirror;
use crate::types::Edition;
use tracing::info;

/// A mirror chosen for a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMirror {
    pub label: String,
    pub url: String,
}

/// Returns the first eligible mirror that answers its probe.
///
/// Mirrors are probed one at a time in registry order and the scan stops at
/// the first success, so later mirrors are never contacted.
pub async fn select_mirror(
    client: &reqwest::Client,
    registry: &MirrorRegistry,
    version: &str,
    edition: Edition,
) -> Result<SelectedMirror, GradleToolError> {
    for mirror in registry.eligible(edition) {
        let url = mirror.url_for(version);
        info!("Checking {}...", mirror.label);

        if probe_mirror(client, &url).await {
            info!("{} is available", mirror.label);
            return Ok(SelectedMirror {
                label: mirror.label.clone(),
                url,
            });
        }
        info!("{} is unavailable", mirror.label);
    }

    Err(GradleToolError::NoMirrorAvailable {
        edition: edition.to_string(),
    })
}

/// Availability of every registry entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub available: Vec<String>,
    pub unavailable: Vec<String>,
}

impl MirrorReport {
    pub fn total(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }
}

/// Probes every mirror of both editions against `version`, in registry order.
pub async fn check_mirrors(
    client: &reqwest::Client,
    registry: &MirrorRegistry,
    version: &str,
) -> MirrorReport {
    let mut report = MirrorReport::default();

    for mirror in registry.entries() {
        if probe_mirror(client, &mirror.url_for(version)).await {
            report.available.push(mirror.label.clone());
        } else {
            report.unavailable.push(mirror.label.clone());
        }
    }

    report
}
