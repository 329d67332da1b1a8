//! Tool provisioning for CI jobs.
//!
//! The [`Provisioner`] turns a [`ToolRequest`] into a local directory of
//! installed binaries: check the cache, and on a miss download the
//! release archive, unpack it into a scratch directory, locate the
//! tool's tree inside it, and register that tree as the cache entry.
//! Every step runs sequentially and any failure aborts the run without
//! publishing a cache entry.
//!
//! # Example
//!
//! ```ignore
//! use toolstrap_cache::ToolCache;
//! use toolstrap_core::{ToolRequest, ToolSpec};
//! use toolstrap_provision::Provisioner;
//!
//! let provisioner = Provisioner::with_http(ToolCache::default());
//! let request = ToolRequest::new(ToolSpec::builtin("cmake")?, "3.25.1")?;
//! let provisioned = provisioner.provision(&request).await?;
//! println!("{}", provisioned.bin_dir.display());
//! ```

mod download;
mod extract;

pub use download::{Downloader, HttpDownloader};
pub use extract::extract_tar_gz;

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use toolstrap_cache::ToolCache;
use toolstrap_core::{Error, Result, ToolRequest};

/// Outcome of a successful provision.
#[derive(Debug, Clone, Serialize)]
pub struct Provisioned {
    /// Tool name.
    pub tool: String,
    /// Provisioned version.
    pub version: String,
    /// Root of the installed tree in the cache.
    pub tool_dir: PathBuf,
    /// Directory holding the tool's executables; this is what the CI
    /// job prepends to PATH.
    pub bin_dir: PathBuf,
    /// Whether the request was served from the cache without a download.
    pub cache_hit: bool,
}

/// Cache-aware tool provisioner.
///
/// Generic over the [`Downloader`] seam; production code uses
/// [`Provisioner::with_http`].
pub struct Provisioner<D: Downloader> {
    cache: ToolCache,
    downloader: D,
}

impl Provisioner<HttpDownloader> {
    /// Create a provisioner backed by the HTTP downloader.
    #[must_use]
    pub fn with_http(cache: ToolCache) -> Self {
        Self::new(cache, HttpDownloader::new())
    }
}

impl<D: Downloader> Provisioner<D> {
    /// Create a provisioner with an explicit downloader.
    #[must_use]
    pub fn new(cache: ToolCache, downloader: D) -> Self {
        Self { cache, downloader }
    }

    /// Ensure the requested tool version is present locally.
    ///
    /// A cache hit returns immediately with no network access and no
    /// revalidation of the entry's contents. On a miss, the full
    /// download / extract / register cycle runs once, sequentially, with
    /// no retries.
    pub async fn provision(&self, request: &ToolRequest) -> Result<Provisioned> {
        let name = request.spec.name;
        let version = &request.version;

        if let Some(tool_dir) = self.cache.find(name, version) {
            info!(tool = name, %version, "Found cached {name} {version}");
            return Ok(self.provisioned(request, tool_dir, true));
        }

        let url = request.download_url();
        info!(tool = name, %version, %url, "Downloading {name} {version}");
        let data = self.downloader.fetch(&url).await?;
        debug!(bytes = data.len(), "Download complete");

        // Scratch directory is dropped (and deleted) on any failure
        // below, so a half-extracted tree never survives the run.
        let scratch =
            tempfile::tempdir().map_err(|e| Error::io_no_path(e, "create scratch dir"))?;
        let archive_name = url.rsplit('/').next().unwrap_or("archive").to_string();
        extract_tar_gz(&data, &archive_name, scratch.path())?;

        let inner = request.archive_dir();
        let tool_tree = scratch.path().join(&inner);
        if !tool_tree.is_dir() {
            return Err(Error::extraction(
                archive_name,
                format!("expected directory '{inner}' not found in archive"),
            ));
        }

        let tool_dir = self.cache.register(name, version, &tool_tree)?;
        info!(tool = name, %version, ?tool_dir, "Cached {name} {version}");

        let provisioned = self.provisioned(request, tool_dir, false);
        if !provisioned.bin_dir.join(request.spec.executable).exists() {
            // Archive layouts have shifted between upstream releases
            // before; surface it without failing the run.
            warn!(
                tool = name,
                %version,
                executable = request.spec.executable,
                "Provisioned bin directory does not contain the expected executable"
            );
        }
        Ok(provisioned)
    }

    fn provisioned(&self, request: &ToolRequest, tool_dir: PathBuf, cache_hit: bool) -> Provisioned {
        let bin_dir = tool_dir.join(request.spec.bin_subpath);
        Provisioned {
            tool: request.spec.name.to_string(),
            version: request.version.clone(),
            tool_dir,
            bin_dir,
            cache_hit,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_tar_gz;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use toolstrap_core::ToolSpec;

    /// Serves one canned archive and counts fetches.
    struct CannedDownloader {
        archive: Vec<u8>,
        fetches: AtomicUsize,
    }

    impl CannedDownloader {
        fn new(archive: Vec<u8>) -> Self {
            Self {
                archive,
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Downloader for CannedDownloader {
        async fn fetch(&self, _url: &str) -> toolstrap_core::Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.archive.clone())
        }
    }

    /// Always fails, counting attempts.
    struct FailingDownloader {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl Downloader for FailingDownloader {
        async fn fetch(&self, url: &str) -> toolstrap_core::Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Err(toolstrap_core::Error::download(url, "HTTP 404"))
        }
    }

    fn cmake_request(version: &str) -> ToolRequest {
        ToolRequest::new(ToolSpec::builtin("cmake").unwrap(), version).unwrap()
    }

    fn cmake_archive(version: &str) -> Vec<u8> {
        let root = format!("cmake-{version}-Linux-x86_64");
        make_tar_gz(&[
            (
                &format!("{root}/bin/cmake"),
                b"#!/bin/sh\necho cmake\n".as_slice(),
            ),
            (&format!("{root}/bin/ctest"), b"#!/bin/sh\n".as_slice()),
            (
                &format!("{root}/share/cmake/Modules/readme"),
                b"modules".as_slice(),
            ),
        ])
    }

    #[tokio::test]
    async fn test_cold_cache_end_to_end() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        let provisioner = Provisioner::new(cache, CannedDownloader::new(cmake_archive("3.25.1")));

        let provisioned = provisioner.provision(&cmake_request("3.25.1")).await.unwrap();

        assert_eq!(provisioned.tool, "cmake");
        assert_eq!(provisioned.version, "3.25.1");
        assert!(!provisioned.cache_hit);
        assert!(provisioned.bin_dir.ends_with("bin"));
        assert!(provisioned.bin_dir.join("cmake").is_file());
        assert_eq!(provisioner.downloader.fetch_count(), 1);

        // Registered under the (name, version) key.
        assert_eq!(
            provisioner.cache.find("cmake", "3.25.1"),
            Some(provisioned.tool_dir)
        );
    }

    #[tokio::test]
    async fn test_second_provision_is_pure_cache_hit() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        let provisioner = Provisioner::new(cache, CannedDownloader::new(cmake_archive("3.25.1")));
        let request = cmake_request("3.25.1");

        let first = provisioner.provision(&request).await.unwrap();
        let second = provisioner.provision(&request).await.unwrap();

        // Exactly one download for two sequential provisions.
        assert_eq!(provisioner.downloader.fetch_count(), 1);
        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(first.bin_dir, second.bin_dir);
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_cache_entry() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        let provisioner = Provisioner::new(
            cache,
            FailingDownloader {
                fetches: AtomicUsize::new(0),
            },
        );

        let err = provisioner
            .provision(&cmake_request("9.9.9"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Download { .. }));
        assert!(provisioner.cache.find("cmake", "9.9.9").is_none());
    }

    #[tokio::test]
    async fn test_corrupt_archive_leaves_no_cache_entry() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        let provisioner =
            Provisioner::new(cache, CannedDownloader::new(b"not a tarball".to_vec()));

        let err = provisioner
            .provision(&cmake_request("3.25.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(provisioner.cache.find("cmake", "3.25.1").is_none());
    }

    #[tokio::test]
    async fn test_unexpected_archive_layout_is_extraction_error() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        // Valid tarball, but without the cmake-<version>-Linux-x86_64 root.
        let archive = make_tar_gz(&[("somewhere-else/bin/cmake", b"x".as_slice())]);
        let provisioner = Provisioner::new(cache, CannedDownloader::new(archive));

        let err = provisioner
            .provision(&cmake_request("3.25.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(provisioner.cache.find("cmake", "3.25.1").is_none());
    }

    #[tokio::test]
    async fn test_missing_executable_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        // Expected root directory, but no cmake binary inside bin/.
        // Upstream layout drift is logged, not treated as a failure.
        let archive = make_tar_gz(&[(
            "cmake-3.25.1-Linux-x86_64/bin/ctest",
            b"#!/bin/sh\n".as_slice(),
        )]);
        let provisioner = Provisioner::new(cache, CannedDownloader::new(archive));

        let provisioned = provisioner.provision(&cmake_request("3.25.1")).await.unwrap();

        assert!(!provisioned.bin_dir.join("cmake").exists());
        // The entry is registered and served as a hit on the next run.
        assert!(provisioner.cache.find("cmake", "3.25.1").is_some());
    }

    #[tokio::test]
    async fn test_doxygen_flat_layout() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().to_path_buf());
        let archive = make_tar_gz(&[(
            "doxygen-1.8.17/bin/doxygen",
            b"#!/bin/sh\n".as_slice(),
        )]);
        let provisioner = Provisioner::new(cache, CannedDownloader::new(archive));

        let request =
            ToolRequest::new(ToolSpec::builtin("doxygen").unwrap(), "1.8.17").unwrap();
        let provisioned = provisioner.provision(&request).await.unwrap();

        assert!(provisioned.bin_dir.join("doxygen").is_file());
        assert!(provisioned.bin_dir.ends_with("bin"));
    }

    #[test]
    fn test_provisioned_serializes() {
        let provisioned = Provisioned {
            tool: "cmake".into(),
            version: "3.25.1".into(),
            tool_dir: PathBuf::from("/cache/cmake/3.25.1"),
            bin_dir: PathBuf::from("/cache/cmake/3.25.1/bin"),
            cache_hit: true,
        };
        let json = serde_json::to_string(&provisioned).unwrap();
        assert!(json.contains("\"tool\":\"cmake\""));
        assert!(json.contains("\"cache_hit\":true"));
    }
}
