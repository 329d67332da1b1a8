//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

use crate::logging::{LogFormat, LogLevel};

/// Provision a prebuilt tool for a CI job and export its bin directory.
///
/// The requested version is resolved from, in order: `--tool-version`,
/// the `INPUT_VERSION` environment variable, then the tool-specific
/// `INPUT_<TOOL>_VERSION` variable.
#[derive(Debug, Parser)]
#[command(name = "toolstrap", version, about)]
pub struct Cli {
    /// Tool to provision (cmake, doxygen).
    pub tool: String,

    /// Version to provision (e.g. "3.25.1"). Overrides INPUT_* variables.
    #[arg(long)]
    pub tool_version: Option<String>,

    /// Cache root directory (default: the user cache dir).
    #[arg(long, env = "TOOLSTRAP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output format for the provision result on stdout.
    #[arg(long, value_enum, default_value = "text")]
    pub output: Output,

    /// Log verbosity (overridden by RUST_LOG).
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format.
    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

/// Stdout rendering of a successful provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Output {
    /// The bin directory path, one line.
    Text,
    /// A JSON object with tool, version, paths, and cache-hit flag.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["toolstrap", "cmake"]);
        assert_eq!(cli.tool, "cmake");
        assert!(cli.tool_version.is_none());
        assert_eq!(cli.output, Output::Text);
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::parse_from([
            "toolstrap",
            "doxygen",
            "--tool-version",
            "1.8.17",
            "--cache-dir",
            "/tmp/cache",
            "--output",
            "json",
        ]);
        assert_eq!(cli.tool, "doxygen");
        assert_eq!(cli.tool_version.as_deref(), Some("1.8.17"));
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert_eq!(cli.output, Output::Json);
    }
}
