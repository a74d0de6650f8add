//! File output helpers

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{FilesystemError, Stage};

/// Temp path next to `path`, with `.tmp` appended to the full file name
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write content to a file atomically using write-then-rename pattern.
///
/// Readers never observe a half-written file; an interrupted run leaves at
/// most a stray `.tmp` sibling.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp = temp_path(path);
    fs::write(&temp, content)?;
    fs::rename(&temp, path)?;
    Ok(())
}

/// `atomic_write` with failures attributed to a pipeline stage
pub fn write_artifact(stage: Stage, path: &Path, content: &str) -> Result<(), FilesystemError> {
    atomic_write(path, content).map_err(|e| FilesystemError::new(stage, path, e))?;
    tracing::debug!(stage = %stage, path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}

pub fn create_dir(stage: Stage, path: &Path) -> Result<(), FilesystemError> {
    fs::create_dir_all(path).map_err(|e| FilesystemError::new(stage, path, e))
}

pub fn remove_file(stage: Stage, path: &Path) -> Result<(), FilesystemError> {
    fs::remove_file(path).map_err(|e| FilesystemError::new(stage, path, e))
}
