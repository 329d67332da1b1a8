//! Persistent tool cache keyed by (tool name, version).
//!
//! The cache maps a (name, version) pair to a directory holding that
//! tool's installed tree. Entries are written once, never revalidated,
//! and reused indefinitely; eviction is left to whatever owns the cache
//! root. Layout:
//!
//! ```text
//! <root>/
//! ├── cmake/
//! │   ├── 3.25.1/           # installed tree (bin/, share/, ...)
//! │   └── 3.25.1.complete   # marker: entry fully registered
//! └── doxygen/
//!     └── ...
//! ```
//!
//! The `.complete` marker makes registration atomic from a reader's
//! perspective: an entry directory without its marker is invisible to
//! [`ToolCache::find`], so a crashed or racing writer can never publish
//! a partial tree.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use toolstrap_core::{Error, Result};

/// Suffix of the completion marker written next to each entry.
const COMPLETE_MARKER: &str = "complete";

/// A host-local tool cache rooted at a directory.
///
/// The cache is an injected collaborator: production code uses
/// [`ToolCache::default`], tests point it at a temp directory.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl Default for ToolCache {
    fn default() -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("toolstrap")
            .join("tools");
        Self::new(root)
    }
}

impl ToolCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a (name, version) entry.
    #[must_use]
    pub fn entry_dir(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version)
    }

    /// Completion marker path for a (name, version) entry.
    fn marker_path(&self, name: &str, version: &str) -> PathBuf {
        self.root
            .join(name)
            .join(format!("{version}.{COMPLETE_MARKER}"))
    }

    /// Look up a cache entry.
    ///
    /// Hits require both the entry directory and its completion marker;
    /// contents are never revalidated.
    #[must_use]
    pub fn find(&self, name: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(name, version);
        if dir.is_dir() && self.marker_path(name, version).exists() {
            trace!(name, version, ?dir, "Cache hit");
            Some(dir)
        } else {
            trace!(name, version, "Cache miss");
            None
        }
    }

    /// Register `source_dir` as the entry for (name, version).
    ///
    /// The tree is moved into place through a staging directory and a
    /// single `rename`, and the completion marker is written only after
    /// the rename lands. A concurrent registration of the same key may
    /// win the rename; both callers still end up advertising a complete
    /// tree. On failure the staging directory is removed and no marker
    /// is written.
    pub fn register(&self, name: &str, version: &str, source_dir: &Path) -> Result<PathBuf> {
        let dest = self.entry_dir(name, version);
        let parent = self.root.join(name);
        std::fs::create_dir_all(&parent)
            .map_err(|e| Error::cache(format!("failed to create {}: {e}", parent.display())))?;

        let staging = parent.join(format!(".{version}.tmp"));
        if staging.exists() {
            // Leftover from a previous failed registration.
            std::fs::remove_dir_all(&staging)
                .map_err(|e| Error::cache(format!("failed to clear {}: {e}", staging.display())))?;
        }

        std::fs::rename(source_dir, &staging)
            .or_else(|_| copy_tree(source_dir, &staging))
            .map_err(|e| {
                Error::cache(format!(
                    "failed to stage {} as {}: {e}",
                    source_dir.display(),
                    staging.display()
                ))
            })?;

        match std::fs::rename(&staging, &dest) {
            Ok(()) => {}
            Err(_) if dest.is_dir() => {
                // Lost the race to a concurrent registration of the same
                // key; its tree is complete, use it.
                debug!(name, version, "Entry registered concurrently");
                let _ = std::fs::remove_dir_all(&staging);
            }
            Err(e) => {
                let _ = std::fs::remove_dir_all(&staging);
                return Err(Error::cache(format!(
                    "failed to publish {}: {e}",
                    dest.display()
                )));
            }
        }

        let marker = self.marker_path(name, version);
        std::fs::write(&marker, b"")
            .map_err(|e| Error::cache(format!("failed to write {}: {e}", marker.display())))?;

        debug!(name, version, ?dest, "Registered cache entry");
        Ok(dest)
    }
}

/// Recursively copy a directory tree.
///
/// Fallback for when the staging rename crosses a filesystem boundary
/// (scratch dirs commonly live on a tmpfs separate from the cache root).
fn copy_tree(src: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else if file_type.is_symlink() {
            // Installed trees link alternate entry points to the main
            // binary (bin/ccmake -> cmake); recreate the link rather
            // than duplicating the file.
            #[cfg(unix)]
            {
                let link = std::fs::read_link(entry.path())?;
                std::os::unix::fs::symlink(link, &target)?;
            }
            #[cfg(not(unix))]
            std::fs::copy(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
