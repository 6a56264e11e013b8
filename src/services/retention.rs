//! Snapshot retention
//!
//! The destination listing is the only record of which snapshots exist. Only
//! directories named `<slug>-<YYYYMMDD-HHMMSS>` belong to a job; anything
//! else under the destination is neither counted nor deleted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{SnapfoxError, SnapfoxResult};
use crate::models::snapshot::parse_snapshot_name;
use crate::models::{Job, SnapshotRecord};

/// Outcome of a prune pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Snapshots left in place
    pub kept: usize,
    /// Snapshots removed, oldest first
    pub deleted: Vec<PathBuf>,
    /// Snapshots that could not be removed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl PruneReport {
    /// Whether every selected snapshot was removed
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

type RemoveFn = fn(&Path) -> io::Result<()>;

/// Deletes the oldest snapshots beyond a job's retention limit
pub struct RetentionPruner {
    remove: RemoveFn,
}

impl Default for RetentionPruner {
    fn default() -> Self {
        Self {
            remove: |path| fs::remove_dir_all(path),
        }
    }
}

impl RetentionPruner {
    /// Pruner deleting snapshots recursively from disk
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_remover(remove: RemoveFn) -> Self {
        Self { remove }
    }

    /// List a job's snapshots, oldest first
    ///
    /// Ties on the timestamp are broken by name.
    pub fn list_snapshots(&self, job: &Job) -> SnapfoxResult<Vec<SnapshotRecord>> {
        let entries = match fs::read_dir(&job.destination) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SnapfoxError::Retention(format!(
                    "Failed to list {}: {}",
                    job.destination.display(),
                    e
                )))
            }
        };

        let prefix = job.snapshot_prefix();
        let mut snapshots = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(job_id = %job.id, error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(taken_at) = parse_snapshot_name(&name, &prefix) {
                snapshots.push(SnapshotRecord {
                    path: entry.path(),
                    name,
                    taken_at,
                });
            }
        }

        snapshots.sort_by(|a, b| a.taken_at.cmp(&b.taken_at).then_with(|| a.name.cmp(&b.name)));
        Ok(snapshots)
    }

    /// Delete the oldest snapshots until `job.max_snapshots` remain
    ///
    /// A limit of 0 disables pruning. Deletion is best effort: a snapshot that
    /// cannot be removed is recorded in the report and the rest are still
    /// processed.
    pub fn prune(&self, job: &Job) -> SnapfoxResult<PruneReport> {
        if !job.retention_enabled() {
            return Ok(PruneReport::default());
        }

        let snapshots = self.list_snapshots(job)?;
        let limit = job.max_snapshots as usize;
        if snapshots.len() <= limit {
            return Ok(PruneReport {
                kept: snapshots.len(),
                ..PruneReport::default()
            });
        }

        let excess = snapshots.len() - limit;
        let mut report = PruneReport {
            kept: limit,
            ..PruneReport::default()
        };

        for snapshot in snapshots.into_iter().take(excess) {
            match (self.remove)(&snapshot.path) {
                Ok(()) => {
                    info!(
                        job_id = %job.id,
                        path = %snapshot.path.display(),
                        "removed old snapshot"
                    );
                    report.deleted.push(snapshot.path);
                }
                Err(e) => {
                    warn!(
                        job_id = %job.id,
                        path = %snapshot.path.display(),
                        error = %e,
                        "failed to remove old snapshot"
                    );
                    report.failed.push((snapshot.path, e.to_string()));
                }
            }
        }

        report.kept += report.failed.len();
        Ok(report)
    }
}
