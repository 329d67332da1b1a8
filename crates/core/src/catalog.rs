//! Built-in tool catalog.
//!
//! Each provisionable tool is described by a [`ToolSpec`]: a configuration
//! record carrying the release URL template, the directory the archive
//! unpacks into, and where the binaries live inside that directory. The
//! record replaces per-tool branches in the provisioning path; adding a
//! tool means adding one catalog entry.

use crate::{Error, Result};

/// Per-tool provisioning record.
///
/// Templates use `{version}` as the only placeholder. Archives are
/// Linux/x86_64 release builds; the catalog does not model other
/// platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Tool name, also the cache key prefix (e.g., "cmake").
    pub name: &'static str,
    /// Release archive URL template.
    pub url_template: &'static str,
    /// Directory the archive unpacks into, relative to the extraction
    /// root. cmake nests its whole tree one level deep; doxygen unpacks
    /// into a flat versioned folder. Both are expressed here.
    pub archive_dir_template: &'static str,
    /// Subpath of the installed tree holding executables.
    pub bin_subpath: &'static str,
    /// Name of the main executable, for post-install checks.
    pub executable: &'static str,
}

/// cmake release builds from the Kitware GitHub releases.
const CMAKE: ToolSpec = ToolSpec {
    name: "cmake",
    url_template:
        "https://github.com/Kitware/CMake/releases/download/v{version}/cmake-{version}-Linux-x86_64.tar.gz",
    archive_dir_template: "cmake-{version}-Linux-x86_64",
    bin_subpath: "bin",
    executable: "cmake",
};

/// doxygen prebuilt Linux binaries from SourceForge.
const DOXYGEN: ToolSpec = ToolSpec {
    name: "doxygen",
    url_template:
        "https://sourceforge.net/projects/doxygen/files/rel-{version}/doxygen-{version}.linux.bin.tar.gz",
    archive_dir_template: "doxygen-{version}",
    bin_subpath: "bin",
    executable: "doxygen",
};

impl ToolSpec {
    /// Look up a tool in the built-in catalog.
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "cmake" => Ok(CMAKE),
            "doxygen" => Ok(DOXYGEN),
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }

    /// Names of all catalog entries.
    #[must_use]
    pub fn names() -> &'static [&'static str] {
        &["cmake", "doxygen"]
    }
}

/// A validated request to provision one version of one tool.
///
/// The version is an opaque string used as a cache key and substituted
/// literally into the URL and archive-directory templates. No version
/// comparison or normalization happens anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    /// Catalog record for the requested tool.
    pub spec: ToolSpec,
    /// Requested version string (e.g., "3.25.1").
    pub version: String,
}

impl ToolRequest {
    /// Create a request, rejecting empty or whitespace-only versions.
    ///
    /// Rejecting here guarantees a malformed download URL can never be
    /// constructed from an absent version.
    pub fn new(spec: ToolSpec, version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(Error::input_missing(spec.name));
        }
        Ok(Self { spec, version })
    }

    /// The fully expanded download URL for this request.
    #[must_use]
    pub fn download_url(&self) -> String {
        expand(self.spec.url_template, &self.version)
    }

    /// The directory this request's archive unpacks into.
    #[must_use]
    pub fn archive_dir(&self) -> String {
        expand(self.spec.archive_dir_template, &self.version)
    }
}

impl std::fmt::Display for ToolRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.spec.name, self.version)
    }
}

/// Expand `{version}` placeholders in a template.
fn expand(template: &str, version: &str) -> String {
    template.replace("{version}", version)
}
