//! Error types for tool provisioning.

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Result type for toolstrap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while provisioning a tool.
///
/// Every error is fatal to the provisioning run: there is no retry and no
/// partial success. A failed run must leave no advertised cache entry.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No version was provided by any configured source.
    #[error("no version requested for {tool}")]
    #[diagnostic(
        code(toolstrap::input_missing),
        help("Pass --tool-version or set INPUT_VERSION / INPUT_<TOOL>_VERSION")
    )]
    InputMissing {
        /// The tool the run was asked to provision.
        tool: String,
    },

    /// Requested tool is not in the built-in catalog.
    #[error("unknown tool: {0}")]
    #[diagnostic(code(toolstrap::unknown_tool))]
    UnknownTool(String),

    /// Download failed (transport error or non-success HTTP status).
    #[error("failed to download {url}: {message}")]
    #[diagnostic(
        code(toolstrap::download),
        help("Check that the requested version exists on the release host")
    )]
    Download {
        /// The URL that was requested.
        url: String,
        /// Transport or status description.
        message: String,
    },

    /// Archive could not be unpacked, or had an unexpected layout.
    #[error("failed to extract {archive}: {message}")]
    #[diagnostic(code(toolstrap::extraction))]
    Extraction {
        /// Name of the archive being unpacked.
        archive: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Cache registration failed.
    #[error("cache error: {message}")]
    #[diagnostic(code(toolstrap::cache))]
    Cache {
        /// Description of the cache failure.
        message: String,
    },

    /// I/O error with operation and path context.
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(toolstrap::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available.
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "rename", "create").
        operation: String,
    },
}

impl Error {
    /// Create an input missing error.
    #[must_use]
    pub fn input_missing(tool: impl Into<String>) -> Self {
        Self::InputMissing { tool: tool.into() }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(archive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Create a cache error.
    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context.
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create an I/O error without path context.
    #[must_use]
    pub fn io_no_path(source: std::io::Error, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: None,
            operation: operation.into(),
        }
    }
}
