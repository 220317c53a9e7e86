//! Streaming transfers: archive download and local copy.
//!
//! Both transfers write into a `.download` staging file next to the
//! destination and rename it into place only once every byte has been
//! flushed, so an interrupted transfer never leaves a file under the final
//! name.

use crate::error::GradleToolError;
use crate::progress::transfer_bar;
use futures_util::StreamExt;
use reqwest::StatusCode;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tracing::{info, warn};

const STAGING_SUFFIX: &str = ".download";

/// Path of the staging file used while writing `destination`.
pub(crate) fn staging_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Downloads `url` into `destination`.
///
/// The request must answer HTTP 200. The body is streamed to disk while a
/// progress bar tracks the bytes received (a spinner when the server sends
/// no Content-Length).
///
/// # Returns
///
/// The number of bytes written.
pub(crate) async fn download_file(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    show_progress: bool,
) -> Result<u64, GradleToolError> {
    let failed = |reason: String| GradleToolError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(failed(format!("HTTP {}", status)));
    }

    let content_length = response.content_length();
    if content_length.is_none() {
        warn!("Content-Length header was not present for {}", url);
    }

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(destination);
    let pb = transfer_bar(
        content_length,
        format!("📥 {}", display_name(destination)),
        show_progress,
    );

    let result = async {
        let mut file = BufWriter::new(tokio::fs::File::create(&staging).await?);
        let mut byte_stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(piece) = byte_stream.next().await {
            let chunk = piece.map_err(|e| failed(e.to_string()))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await?;
        Ok::<u64, GradleToolError>(written)
    }
    .await;

    let written = match result {
        Ok(written) => written,
        Err(e) => {
            pb.abandon_with_message("❌ Download failed");
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(match e {
                GradleToolError::IoError(io) => failed(io.to_string()),
                other => other,
            });
        }
    };

    tokio::fs::rename(&staging, destination).await?;
    pb.finish_with_message("✅ Download complete");
    info!("Downloaded {} ({} bytes)", display_name(destination), written);

    Ok(written)
}

/// Copies `source` to `destination` with a byte progress bar.
///
/// # Returns
///
/// The number of bytes copied.
pub(crate) async fn copy_file(
    source: &Path,
    destination: &Path,
    show_progress: bool,
) -> Result<u64, GradleToolError> {
    let mut reader = tokio::fs::File::open(source).await?;
    let total = reader.metadata().await?.len();

    let staging = staging_path(destination);
    let pb = transfer_bar(
        Some(total),
        format!("📋 {}", display_name(destination)),
        show_progress,
    );

    let result = async {
        let mut writer = BufWriter::new(tokio::fs::File::create(&staging).await?);
        let mut buffer = vec![0u8; 256 * 1024];
        let mut copied = 0u64;

        loop {
            let n = reader.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n]).await?;
            copied += n as u64;
            pb.inc(n as u64);
        }
        writer.flush().await?;
        Ok::<u64, std::io::Error>(copied)
    }
    .await;

    let copied = match result {
        Ok(copied) => copied,
        Err(e) => {
            pb.abandon_with_message("❌ Copy failed");
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
    };

    tokio::fs::rename(&staging, destination).await?;
    pb.finish_with_message("✅ Copy complete");

    Ok(copied)
}
