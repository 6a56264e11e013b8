//! Snapshot execution
//!
//! One run of a job: check the source, make sure the destination root exists,
//! create `<slug>-<timestamp>` under it and have the sync tool mirror the
//! source into it. Only a successful copy updates `last_run`; persisting the
//! job is left to the caller.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::{Command, Stdio};

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{SnapfoxError, SnapfoxResult};
use crate::models::{snapshot_dir_name, Job};

/// Copies the contents of a source directory into a target directory
pub trait SyncTool {
    /// Mirror `source` into `target`, removing anything in `target` that is
    /// not in `source`
    fn mirror(&self, source: &Path, target: &Path) -> SnapfoxResult<()>;
}

/// `rsync -a --delete SRC/ DST/`
#[derive(Debug, Clone)]
pub struct RsyncTool {
    program: String,
    extra_args: Vec<String>,
}

impl RsyncTool {
    /// Use `program` with no extra arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Build from the store's sync settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: settings.sync_program.clone(),
            extra_args: settings.sync_extra_args.clone(),
        }
    }

    /// The command mirroring `source` into `target`
    ///
    /// Both paths get a trailing separator so the *contents* of the source
    /// land directly in the target.
    pub fn command(&self, source: &Path, target: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-a")
            .arg("--delete")
            .args(&self.extra_args)
            .arg(with_trailing_separator(source))
            .arg(with_trailing_separator(target))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl SyncTool for RsyncTool {
    fn mirror(&self, source: &Path, target: &Path) -> SnapfoxResult<()> {
        let mut cmd = self.command(source, target);
        debug!(command = ?cmd, "starting sync");

        // Blocks until the tool exits; output goes straight to the terminal
        let status = cmd
            .status()
            .map_err(|e| SnapfoxError::Sync(format!("failed to start {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(SnapfoxError::Sync(format!(
                "{} failed ({})",
                self.program, status
            )))
        }
    }
}

fn with_trailing_separator(path: &Path) -> OsString {
    let mut arg = OsString::from(path.as_os_str());
    let has_separator = path
        .to_str()
        .is_some_and(|s| s.ends_with(MAIN_SEPARATOR) || s.ends_with('/'));
    if !has_separator {
        arg.push(MAIN_SEPARATOR.to_string());
    }
    arg
}

/// Result of a successful snapshot run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    /// Directory the source was mirrored into
    pub snapshot_dir: PathBuf,
    /// Time recorded as the job's `last_run`
    pub taken_at: DateTime<FixedOffset>,
}

/// Runs single snapshots through a [`SyncTool`]
pub struct SnapshotExecutor<'a> {
    sync: &'a dyn SyncTool,
}

impl<'a> SnapshotExecutor<'a> {
    /// Create an executor using `sync` for the copy
    pub fn new(sync: &'a dyn SyncTool) -> Self {
        Self { sync }
    }

    /// Take one snapshot of `job` at `now`
    ///
    /// On success `job.last_run` is set to `now`. On any failure the job is
    /// left untouched.
    pub fn run_one(
        &self,
        job: &mut Job,
        now: &DateTime<FixedOffset>,
    ) -> SnapfoxResult<SnapshotOutcome> {
        check_source(&job.source)?;

        fs::create_dir_all(&job.destination).map_err(|e| {
            SnapfoxError::DestinationUncreatable {
                path: job.destination.clone(),
                reason: e.to_string(),
            }
        })?;

        let snapshot_dir = job.destination.join(snapshot_dir_name(&job.name, now));
        fs::create_dir_all(&snapshot_dir).map_err(|e| SnapfoxError::DestinationUncreatable {
            path: snapshot_dir.clone(),
            reason: e.to_string(),
        })?;

        info!(
            job_id = %job.id,
            job = %job.name,
            from = %job.source.display(),
            to = %snapshot_dir.display(),
            "running snapshot"
        );

        self.sync.mirror(&job.source, &snapshot_dir)?;

        job.record_run(now);
        Ok(SnapshotOutcome {
            snapshot_dir,
            taken_at: *now,
        })
    }
}

fn check_source(source: &Path) -> SnapfoxResult<()> {
    let metadata = fs::metadata(source).map_err(|e| SnapfoxError::SourceUnavailable {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(SnapfoxError::SourceUnavailable {
            path: source.to_path_buf(),
            reason: "not a directory".into(),
        });
    }
    Ok(())
}
