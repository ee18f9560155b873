//! File helpers

use crate::error::{HashgenError, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the sibling temp file used while replacing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("manifest"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace the file at `path` with `content` (temp file + rename).
///
/// The original file is only touched by the final rename, so a failed write
/// leaves it as it was. A symlinked manifest is replaced at its target, and
/// the existing file's permissions carry over.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let temp = temp_path(&target);

    if let Err(e) = write_synced(&temp, content, &target) {
        let _ = fs::remove_file(&temp);
        return Err(HashgenError::io(&temp, e));
    }

    fs::rename(&temp, &target).map_err(|e| {
        let _ = fs::remove_file(&temp);
        HashgenError::io(&target, e)
    })?;

    tracing::debug!("Replaced {:?}", target);
    Ok(())
}

/// Write `content` to `temp` with the permissions of `original`, flushed to disk.
fn write_synced(temp: &Path, content: &str, original: &Path) -> std::io::Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(content.as_bytes())?;
    if let Ok(metadata) = fs::metadata(original) {
        file.set_permissions(metadata.permissions())?;
    }
    file.sync_all()
}
