//! MCr Gradle tools - fetch Gradle distributions from mirrors and repair stale downloads
//!
//! MCreator drives Gradle through the wrapper, which downloads its distribution
//! from `services.gradle.org`. When that download stalls or dies, the wrapper
//! leaves `.lck` / `.part` markers behind and refuses to try again. This
//! library fetches the same archive from regional mirrors, keeps a local
//! cache, and drops the archive where the wrapper expects it.
//!
//! # Features
//!
//! - **Mirror Fallback**: Probe mirrors in priority order, use the first that answers
//! - **Local Cache**: Each distribution is downloaded once
//! - **Marker Repair**: Find stale wrapper downloads and replace them
//! - **Progress Tracking**: Byte progress for downloads and copies
//!
//! # Example
//!
//! ```no_run
//! use mcr_gradletools::{process_gradle_dir, ToolConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToolConfig::from_env();
//! let summary = process_gradle_dir(&config, &config.gradle_dir).await?;
//! println!("repaired {} distribution(s)", summary.installed.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
mod download;
pub mod error;
pub mod mirrors;
mod orchestrator;
pub mod probe;
mod progress;
pub mod scanner;
pub mod selector;
mod types;

pub use cache::CacheStore;
pub use error::GradleToolError;
pub use mirrors::{MirrorEntry, MirrorRegistry};
pub use orchestrator::{
    check_all_mirrors, delete_markers, download_gradle, fetch_distribution, process_gradle_dir,
    repair_groups, RemediationSummary,
};
pub use scanner::{scan, MarkerGroup};
pub use selector::{MirrorReport, SelectedMirror};
pub use types::{DownloadOutcome, DownloadRequest, Edition, ToolConfig};
