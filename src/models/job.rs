//! Backup job model
//!
//! A job pairs a source directory with a destination root and carries the
//! scheduling interval, the retention limit and the time of the last
//! successful run.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::ids::JobId;
use super::snapshot::{slugify, snapshot_prefix};

/// Retention limit applied when a job is created without one
pub const DEFAULT_MAX_SNAPSHOTS: u32 = 10;

/// Interval offered by the interactive flows
pub const DEFAULT_INTERVAL_HOURS: u32 = 24;

/// A configured backup job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier, never reused
    pub id: JobId,

    /// Human label, also the base of the snapshot directory names
    pub name: String,

    /// Directory whose contents are mirrored
    pub source: PathBuf,

    /// Root under which snapshot directories are created
    pub destination: PathBuf,

    /// Hours between runs; 0 means manual only
    #[serde(default)]
    pub interval_hours: u32,

    /// Number of snapshots to keep; 0 means unlimited
    #[serde(default)]
    pub max_snapshots: u32,

    /// RFC 3339 timestamp of the last successful run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
}

/// Input for creating a job; the store assigns the ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub interval_hours: u32,
    /// `None` applies [`DEFAULT_MAX_SNAPSHOTS`]
    pub max_snapshots: Option<u32>,
}

impl Job {
    /// Build a job from creation input
    pub fn from_new(id: JobId, new_job: NewJob) -> Self {
        Self {
            id,
            name: new_job.name,
            source: new_job.source,
            destination: new_job.destination,
            interval_hours: new_job.interval_hours,
            max_snapshots: new_job.max_snapshots.unwrap_or(DEFAULT_MAX_SNAPSHOTS),
            last_run: None,
        }
    }

    /// Parsed time of the last successful run
    ///
    /// Empty or unparsable values read as "never run".
    pub fn last_run_at(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.last_run.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(raw).ok()
    }

    /// Record a successful run at `now`
    pub fn record_run(&mut self, now: &DateTime<FixedOffset>) {
        self.last_run = Some(now.to_rfc3339_opts(SecondsFormat::Secs, false));
    }

    /// Whether the job only runs when triggered explicitly
    pub fn is_manual(&self) -> bool {
        self.interval_hours == 0
    }

    /// Whether old snapshots are pruned after a run
    pub fn retention_enabled(&self) -> bool {
        self.max_snapshots > 0
    }

    /// Filesystem-safe form of the name
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Prefix of this job's snapshot directory names
    pub fn snapshot_prefix(&self) -> String {
        snapshot_prefix(&self.name)
    }

    /// Validate the job
    pub fn validate(&self) -> Result<(), JobValidationError> {
        validate_fields(&self.name, &self.source, &self.destination)
    }
}

impl NewJob {
    /// Validate creation input
    pub fn validate(&self) -> Result<(), JobValidationError> {
        validate_fields(&self.name, &self.source, &self.destination)
    }
}

fn validate_fields(
    name: &str,
    source: &std::path::Path,
    destination: &std::path::Path,
) -> Result<(), JobValidationError> {
    if name.trim().is_empty() {
        return Err(JobValidationError::EmptyName);
    }
    if name.len() > 100 {
        return Err(JobValidationError::NameTooLong(name.len()));
    }
    if !source.is_absolute() {
        return Err(JobValidationError::RelativePath(source.to_path_buf()));
    }
    if !destination.is_absolute() {
        return Err(JobValidationError::RelativePath(destination.to_path_buf()));
    }
    Ok(())
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.name)
    }
}

/// Validation errors for jobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    EmptyName,
    NameTooLong(usize),
    RelativePath(PathBuf),
}

impl fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Job name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Job name too long ({} chars, max 100)", len),
            Self::RelativePath(path) => {
                write!(f, "Path must be absolute: {}", path.display())
            }
        }
    }
}

impl std::error::Error for JobValidationError {}
