//! Temp-file-then-rename writes.

use notecraft_error::{NotecraftResult, StorageError, StorageErrorKind};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Creates `dir` and any missing parents.
pub(crate) fn ensure_dir(dir: &Path) -> NotecraftResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `data` to a hidden sibling of `path`, then renames it into place.
pub(crate) async fn write_atomic(path: &Path, data: &[u8]) -> NotecraftResult<()> {
    let temp = temp_path(path);
    tokio::fs::write(&temp, data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp.display(),
            e
        )))
    })?;

    if let Err(e) = tokio::fs::rename(&temp, path).await {
        // Best effort; the rename error is the one worth reporting.
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp.display(),
            path.display(),
            e
        )))
        .into());
    }
    Ok(())
}
