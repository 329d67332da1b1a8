//! Version input resolution.
//!
//! CI runners hand action inputs to the process as `INPUT_*` environment
//! variables. Historically the version could arrive either as the shared
//! `version` input or as a tool-specific fallback (`cmake-version`,
//! `doxygen-version`). That "try A, else B" lookup is expressed here as an
//! explicit ordered source list, resolved exactly once at startup into a
//! validated [`ToolRequest`]. An empty or absent version fails fast with
//! [`Error::InputMissing`] before any network access.

use tracing::debug;

use crate::{Error, Result, ToolRequest, ToolSpec};

/// One place a version string may come from, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    /// An explicit value, e.g. from a CLI flag.
    Explicit(Option<String>),
    /// An environment variable, e.g. `INPUT_VERSION`.
    Env(String),
}

impl VersionSource {
    /// Runner-style environment variable name for a tool-specific input
    /// (`cmake` -> `INPUT_CMAKE_VERSION`).
    #[must_use]
    pub fn tool_env(tool: &str) -> Self {
        Self::Env(format!(
            "INPUT_{}_VERSION",
            tool.to_uppercase().replace('-', "_")
        ))
    }

    fn get(&self) -> Option<String> {
        match self {
            Self::Explicit(value) => value.clone(),
            Self::Env(name) => std::env::var(name).ok(),
        }
    }
}

/// Resolve the requested version for `spec` from an ordered source list.
///
/// The first source yielding a non-empty value wins. If every source is
/// empty or unset, the run aborts with [`Error::InputMissing`].
pub fn resolve_version(spec: ToolSpec, sources: &[VersionSource]) -> Result<ToolRequest> {
    for source in sources {
        let Some(value) = source.get() else {
            continue;
        };
        if value.trim().is_empty() {
            continue;
        }
        debug!(tool = spec.name, version = %value, ?source, "Resolved version input");
        return ToolRequest::new(spec, value);
    }
    Err(Error::input_missing(spec.name))
}

/// The default source order for a tool: explicit flag value, then the
/// shared `version` input, then the tool-specific fallback input.
#[must_use]
pub fn default_sources(tool: &str, flag: Option<String>) -> Vec<VersionSource> {
    vec![
        VersionSource::Explicit(flag),
        VersionSource::Env("INPUT_VERSION".to_string()),
        VersionSource::tool_env(tool),
    ]
}
