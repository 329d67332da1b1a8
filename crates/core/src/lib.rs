//! Core types for the toolstrap provisioner.
//!
//! This crate holds everything the other toolstrap crates share:
//!
//! - [`ToolSpec`] / [`ToolRequest`] - the per-tool configuration record
//!   (download URL template, archive layout, binary subpath) and a
//!   validated request for one version of one tool
//! - [`resolve_version`] - ordered resolution of the requested version
//!   from CLI and runner-provided configuration sources
//! - [`Error`] / [`Result`] - the error taxonomy for provisioning

mod catalog;
mod error;
mod inputs;

pub use catalog::{ToolRequest, ToolSpec};
pub use error::{Error, Result};
pub use inputs::{default_sources, resolve_version, VersionSource};
