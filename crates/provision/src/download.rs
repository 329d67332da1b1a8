//! Archive download seam.
//!
//! The provisioner talks to the network through the [`Downloader`] trait
//! so the cache-hit path's "no network" guarantee can be asserted in
//! tests with a counting fake.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use toolstrap_core::{Error, Result};

/// Fetches a release archive as bytes.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download the resource at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Download`] on transport failure or a non-success
    /// HTTP status (e.g. a 404 for a version that was never released).
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP downloader backed by reqwest.
pub struct HttpDownloader {
    client: Client,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpDownloader {
    /// Create a new HTTP downloader.
    ///
    /// # Panics
    ///
    /// `Client::builder().build()` only fails when the TLS backend cannot
    /// initialize, which indicates a broken environment rather than a
    /// recoverable condition.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("toolstrap")
                .build()
                .expect("Failed to create HTTP client - TLS backend initialization failed"),
        }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "Downloading archive");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Error::download(url, e.to_string()))
    }
}
