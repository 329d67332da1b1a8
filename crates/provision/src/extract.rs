//! Archive extraction.

use flate2::read::GzDecoder;
use std::io::Cursor;
use std::path::Path;
use tar::Archive;
use tracing::debug;

use toolstrap_core::{Error, Result};

/// Unpack a gzip-compressed tarball into `dest`.
///
/// Release archives for the cataloged tools are all tar.gz; other
/// formats are not supported.
pub fn extract_tar_gz(data: &[u8], archive_name: &str, dest: &Path) -> Result<()> {
    debug!(archive = archive_name, ?dest, "Unpacking archive");

    std::fs::create_dir_all(dest).map_err(|e| Error::io(e, dest, "create"))?;

    let decoder = GzDecoder::new(Cursor::new(data));
    let mut archive = Archive::new(decoder);
    archive
        .unpack(dest)
        .map_err(|e| Error::extraction(archive_name, e.to_string()))?;

    Ok(())
}
