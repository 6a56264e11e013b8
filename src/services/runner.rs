//! Batch orchestration
//!
//! Runs jobs one after another in stored order, isolates failures per job and
//! saves the store exactly once when the batch is over.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use tracing::{error, info, warn};

use crate::error::SnapfoxResult;
use crate::models::{Job, JobId};
use crate::storage::{Config, ConfigStore};

use super::retention::RetentionPruner;
use super::schedule::is_due;
use super::snapshot::{SnapshotExecutor, SyncTool};

/// Which jobs a batch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Every job, regardless of schedule
    All,
    /// Only jobs whose interval has elapsed
    DueOnly,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::DueOnly => write!(f, "due-only"),
        }
    }
}

/// What happened to one job in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Snapshot taken; retention problems are warnings only
    Completed {
        snapshot_dir: PathBuf,
        pruned: usize,
        retention_warnings: Vec<String>,
    },
    /// Not due in a due-only batch
    Skipped,
    /// The run failed; `last_run` was left unchanged
    Failed(String),
}

/// Per-job entry of a [`BatchReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub id: JobId,
    pub name: String,
    pub outcome: JobOutcome,
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    /// Number of jobs that took a snapshot
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::Completed { .. }))
    }

    /// Number of jobs that failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::Failed(_)))
    }

    /// Number of jobs that were not due
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, JobOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&JobOutcome) -> bool) -> usize {
        self.jobs.iter().filter(|j| pred(&j.outcome)).count()
    }
}

/// Runs batches of jobs against a store
pub struct Runner<'a> {
    sync: &'a dyn SyncTool,
    store: &'a dyn ConfigStore,
    pruner: RetentionPruner,
}

impl<'a> Runner<'a> {
    /// Create a runner copying with `sync` and persisting to `store`
    pub fn new(sync: &'a dyn SyncTool, store: &'a dyn ConfigStore) -> Self {
        Self {
            sync,
            store,
            pruner: RetentionPruner::new(),
        }
    }

    /// Run a batch and save the store once
    ///
    /// Individual job failures end up in the report. Only a failing save is
    /// returned as an error.
    pub fn run_batch(
        &self,
        config: &mut Config,
        mode: RunMode,
        now: &DateTime<FixedOffset>,
    ) -> SnapfoxResult<BatchReport> {
        info!(%mode, jobs = config.jobs.len(), "starting batch");

        let mut report = BatchReport::default();
        for job in config.jobs.iter_mut() {
            let outcome = if mode == RunMode::DueOnly && !is_due(job, now) {
                JobOutcome::Skipped
            } else {
                self.run_job(job, now)
            };

            report.jobs.push(JobReport {
                id: job.id,
                name: job.name.clone(),
                outcome,
            });
        }

        self.store.save(config)?;

        info!(
            completed = report.completed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "batch finished"
        );
        Ok(report)
    }

    fn run_job(&self, job: &mut Job, now: &DateTime<FixedOffset>) -> JobOutcome {
        let executor = SnapshotExecutor::new(self.sync);
        let snapshot = match executor.run_one(job, now) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_job_level() => {
                warn!(job_id = %job.id, job = %job.name, error = %e, "job failed");
                return JobOutcome::Failed(e.to_string());
            }
            Err(e) => {
                error!(job_id = %job.id, job = %job.name, error = %e, "job failed");
                return JobOutcome::Failed(e.to_string());
            }
        };

        let mut pruned = 0;
        let mut retention_warnings = Vec::new();
        if job.retention_enabled() {
            match self.pruner.prune(job) {
                Ok(prune) => {
                    pruned = prune.deleted.len();
                    retention_warnings.extend(
                        prune
                            .failed
                            .into_iter()
                            .map(|(path, reason)| format!("{}: {}", path.display(), reason)),
                    );
                }
                Err(e) => {
                    warn!(job_id = %job.id, job = %job.name, error = %e, "retention failed");
                    retention_warnings.push(e.to_string());
                }
            }
        }

        info!(job_id = %job.id, job = %job.name, pruned, "job done");
        JobOutcome::Completed {
            snapshot_dir: snapshot.snapshot_dir,
            pruned,
            retention_warnings,
        }
    }
}
