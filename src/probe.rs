//! HTTP client construction and mirror availability probing.

use crate::error::GradleToolError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Some mirrors reject requests without a browser-like user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Builds a client carrying the mirror header set and the given overall timeout.
///
/// Probes and downloads use separate clients so that each gets its own timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, GradleToolError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Checks whether `url` is downloadable right now.
///
/// Uses GET rather than HEAD because some mirrors reject HEAD. Only HTTP 200
/// counts as available; transport errors, timeouts and any other status all
/// yield `false`. The response is dropped unread, which closes the connection.
pub async fn probe_mirror(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            debug!("Probe {} -> HTTP {}", url, status);
            status == StatusCode::OK
        }
        Err(e) => {
            debug!("Probe {} failed: {}", url, e);
            false
        }
    }
}
