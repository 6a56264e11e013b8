//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::SnapfoxError;

/// Read a file to a string, returning `None` if it doesn't exist
pub fn read_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<String>, SnapfoxError> {
    let path = path.as_ref();

    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SnapfoxError::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Sibling path used while writing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all; a crash
/// at any point before the rename leaves the previous content in place.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), SnapfoxError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            SnapfoxError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target, so the rename never crosses filesystems
    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path)
            .map_err(|e| SnapfoxError::Storage(format!("Failed to rename temp file: {}", e)))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp<T: Serialize>(temp_path: &Path, data: &T) -> Result<(), SnapfoxError> {
    let file = File::create(temp_path)
        .map_err(|e| SnapfoxError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| SnapfoxError::Storage(format!("Failed to serialize data: {}", e)))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .map_err(|e| SnapfoxError::Storage(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| SnapfoxError::Storage(format!("Failed to sync data: {}", e)))
}
