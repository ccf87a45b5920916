// Writes encoded snapshots to disk: the storage slot (Save) and export files (Export).

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Write `bytes` to `path`, creating parent folders as needed.
pub fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(Error::Export("refusing to write an empty snapshot".into()));
    }
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, bytes).map_err(io_err)?;
    info!(path = %path.display(), len = bytes.len(), "snapshot written");
    Ok(())
}
