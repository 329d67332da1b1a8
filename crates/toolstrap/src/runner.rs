//! CI runner integration.
//!
//! The provisioner itself never touches the job's environment; this
//! module is the integration layer that makes a provisioned tool visible
//! to subsequent steps. On GitHub-style runners that means appending the
//! bin directory to the file named by `$GITHUB_PATH` (the runner
//! prepends each line to PATH for later steps) and surfacing failures as
//! `::error::` workflow-command annotations on stdout.

use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

use toolstrap_core::{Error, Result};

/// Environment variable naming the runner's PATH export file.
pub const GITHUB_PATH_VAR: &str = "GITHUB_PATH";

/// Export `bin_dir` to subsequent job steps.
///
/// Appends one line to the `$GITHUB_PATH` file when the variable is set.
/// Outside a runner (local runs, tests) there is nothing to export and
/// this is a no-op.
pub fn export_path(bin_dir: &Path) -> Result<()> {
    let Ok(path_file) = std::env::var(GITHUB_PATH_VAR) else {
        debug!("GITHUB_PATH not set; skipping PATH export");
        return Ok(());
    };

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path_file)
        .map_err(|e| Error::io(e, &path_file, "open"))?;
    writeln!(file, "{}", bin_dir.display()).map_err(|e| Error::io(e, &path_file, "append"))?;

    debug!(?bin_dir, path_file, "Exported bin directory to PATH");
    Ok(())
}

/// Report a provisioning failure to the runner.
///
/// Emits an `::error::` workflow command so the annotation shows up on
/// the job, mirroring `core.setFailed`. The message is flattened to one
/// line; workflow commands are line-oriented.
pub fn report_failure(message: &str) {
    let flattened = message.replace('\n', " ");
    // Workflow commands are parsed from stdout.
    #[allow(clippy::print_stdout)]
    {
        println!("::error::{flattened}");
    }
    warn!(message, "Provisioning failed");
}
