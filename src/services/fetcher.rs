//! Feed source resolution and retrieval
//!
//! A feed is either an HTTP(S) URL or a local file path. Both are read fully
//! into memory before parsing.

use crate::types::{DropfeedError, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Where the feed CSV lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` become URLs, anything else a file path
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Fetch the full feed text
    pub fn fetch(&self) -> Result<String> {
        match self {
            Self::Url(url) => fetch_url(url),
            Self::File(path) => {
                debug!(path = %path.display(), "reading feed file");
                fs::read_to_string(path).map_err(|e| {
                    DropfeedError::Fetch(format!("cannot read {}: {}", path.display(), e))
                })
            }
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// GET the feed; any transport failure or non-success status is a fetch error
fn fetch_url(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| DropfeedError::Fetch(format!("HTTP client error: {}", e)))?;

    info!(url, "fetching feed");
    let response = client
        .get(url)
        .send()
        .map_err(|e| DropfeedError::Fetch(format!("HTTP request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DropfeedError::Fetch(format!("{} returned HTTP {}", url, status)));
    }

    response
        .text()
        .map_err(|e| DropfeedError::Fetch(format!("failed to read body: {}", e)))
}
