//! Document source abstraction for the well-data JSON.
//!
//! The same polling loop reads from a local file (deployments where the
//! export job writes next to the binary) or over HTTP (exports served by a
//! web server). Sources return the parsed JSON value; interpretation is the
//! normalizer's job.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Trait abstracting where the data document comes from.
#[async_trait]
pub trait DocumentSource: Send + Sync + 'static {
    /// Fetch and parse the current document.
    async fn fetch(&mut self) -> Result<Value>;

    /// Human-readable name for logging (e.g. "file", "http").
    fn source_name(&self) -> &str;

    /// Where the document is read from, for logs and the status endpoint.
    fn location(&self) -> String;
}

// ============================================================================
// File Source
// ============================================================================

/// Reads the document from a local path on every poll.
///
/// The path is taken literally — no cache-defeating parameter, filesystems
/// do not cache stale documents the way HTTP intermediaries do.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&mut self) -> Result<Value> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))
    }

    fn source_name(&self) -> &str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// HTTP Source
// ============================================================================

/// Fetches the document over HTTP.
///
/// A `ts` query parameter with the current epoch milliseconds defeats
/// intermediate caches on every fetch, alongside a `Cache-Control: no-store`
/// request header.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    fn cache_busted_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}ts={}",
            self.url,
            separator,
            chrono::Utc::now().timestamp_millis()
        )
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&mut self) -> Result<Value> {
        let url = self.cache_busted_url();
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", self.url))?;
        response
            .json()
            .await
            .with_context(|| format!("Invalid JSON from {}", self.url))
    }

    fn source_name(&self) -> &str {
        "http"
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}
