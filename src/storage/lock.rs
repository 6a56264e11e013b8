//! Advisory lock for the job store
//!
//! A batch run reads the store, runs for a long time and writes it back. Two
//! overlapping invocations (a manual run racing a timer) would lose each
//! other's updates and could prune the same snapshots twice, so commands that
//! write the store hold `<store>.lock` for their whole duration.
//!
//! The lock file holds the owner's PID. A lock whose owner is gone is stale
//! and gets replaced.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{SnapfoxError, SnapfoxResult};

const ACQUIRE_ATTEMPTS: usize = 3;

/// Held store lock, released on drop
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the lock at `path`
    ///
    /// # Errors
    ///
    /// Returns `Locked` if another live process holds it.
    pub fn acquire(path: impl Into<PathBuf>) -> SnapfoxResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SnapfoxError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        for _ in 0..ACQUIRE_ATTEMPTS {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    writeln!(file, "{}", std::process::id()).map_err(|e| {
                        SnapfoxError::Storage(format!("Failed to write lock file: {}", e))
                    })?;
                    debug!(path = %path.display(), "store lock acquired");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    let owner = match fs::read_to_string(&path) {
                        Ok(text) => text.trim().parse::<u32>().ok(),
                        Err(e) if e.kind() == ErrorKind::NotFound => continue,
                        Err(e) => return Err(lock_error(&path, e)),
                    };

                    if let Some(pid) = owner.filter(|pid| process_alive(*pid)) {
                        return Err(SnapfoxError::Locked(format!(
                            "{} is held by process {} (remove it if no other snapfox is running)",
                            path.display(),
                            pid
                        )));
                    }

                    warn!(path = %path.display(), "removing stale store lock");
                    match fs::remove_file(&path) {
                        Ok(()) => continue,
                        Err(e) if e.kind() == ErrorKind::NotFound => continue,
                        Err(e) => return Err(lock_error(&path, e)),
                    }
                }
                Err(e) => return Err(lock_error(&path, e)),
            }
        }

        Err(SnapfoxError::Locked(format!(
            "could not acquire {}",
            path.display()
        )))
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}

fn lock_error(path: &Path, e: std::io::Error) -> SnapfoxError {
    SnapfoxError::Storage(format!("Failed to lock {}: {}", path.display(), e))
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Without /proc there is no cheap liveness check; keep the lock.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}
