//! Job store backed by a single JSON file
//!
//! [`Config`] is the in-memory document: the ordered job list, the identity
//! counter and the sync settings. [`JobStore`] loads and saves it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{SnapfoxError, SnapfoxResult};
use crate::models::{Job, JobId, NewJob};

use super::file_io::{read_if_exists, write_json_atomic};
use super::migrate::{parse_config, LoadOutcome};

/// Schema version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// The persisted job store document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Next identity to hand out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,

    /// Sync tool settings
    #[serde(default)]
    pub settings: Settings,

    /// Jobs in insertion order
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            next_id: None,
            settings: Settings::default(),
            jobs: Vec::new(),
        }
    }
}

impl Config {
    /// Add a job and return its assigned ID
    ///
    /// The ID comes from the persisted counter, never lower than one past the
    /// largest existing ID, so deleted IDs are not handed out again.
    pub fn add_job(&mut self, new_job: NewJob) -> SnapfoxResult<JobId> {
        new_job
            .validate()
            .map_err(|e| SnapfoxError::Validation(e.to_string()))?;

        let id = self.next_job_id()?;
        // The counter must be able to move past the new ID
        let following = id.next().ok_or_else(id_space_exhausted)?;
        self.jobs.push(Job::from_new(id, new_job));
        self.next_id = Some(following.value());
        Ok(id)
    }

    fn next_job_id(&self) -> SnapfoxResult<JobId> {
        let after_max = match self.jobs.iter().map(|j| j.id).max() {
            Some(max) => max.next().ok_or_else(id_space_exhausted)?,
            None => JobId::new(1),
        };
        let counter = JobId::new(self.next_id.unwrap_or(0));
        Ok(counter.max(after_max))
    }

    /// Get a job by ID
    pub fn find_by_id(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Get a mutable job by ID
    pub fn find_by_id_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }

    /// Get a job by ID or fail with `NotFound`
    pub fn get(&self, id: JobId) -> SnapfoxResult<&Job> {
        self.find_by_id(id)
            .ok_or_else(|| SnapfoxError::job_not_found(id.to_string()))
    }

    /// Remove a job, keeping the order of the others
    pub fn delete_by_id(&mut self, id: JobId) -> SnapfoxResult<Job> {
        let index = self
            .jobs
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| SnapfoxError::job_not_found(id.to_string()))?;

        // Pin the counter so the deleted ID stays retired
        if self.next_id.is_none() {
            let pinned = self.next_job_id().map_or(u64::MAX, |id| id.value());
            self.next_id = Some(pinned);
        }
        Ok(self.jobs.remove(index))
    }

    /// Check that job identities are unique
    pub fn check_unique_ids(&self) -> SnapfoxResult<()> {
        let mut seen = HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.id) {
                return Err(SnapfoxError::Config(format!(
                    "Duplicate job id {} in job store",
                    job.id
                )));
            }
        }
        Ok(())
    }
}

fn id_space_exhausted() -> SnapfoxError {
    SnapfoxError::Validation("job id space exhausted".into())
}

/// Persistence seam used by the runner
pub trait ConfigStore {
    /// Load the current configuration
    fn load(&self) -> SnapfoxResult<Config>;

    /// Persist the configuration
    fn save(&self, config: &Config) -> SnapfoxResult<()>;
}

/// File-backed job store
#[derive(Debug, Clone)]
pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    /// Create a store for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and report whether a migration was applied
    ///
    /// A missing file yields an empty configuration.
    pub fn load_with_outcome(&self) -> SnapfoxResult<LoadOutcome> {
        let Some(contents) = read_if_exists(&self.path)? else {
            debug!(path = %self.path.display(), "job store not found, starting empty");
            return Ok(LoadOutcome::Current(Config::default()));
        };

        let outcome = parse_config(&contents).map_err(|e| {
            SnapfoxError::Config(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        if let LoadOutcome::Migrated { from_version, .. } = &outcome {
            info!(
                path = %self.path.display(),
                from_version,
                to_version = CURRENT_SCHEMA_VERSION,
                "migrated legacy job store"
            );
        }

        match &outcome {
            LoadOutcome::Current(config) | LoadOutcome::Migrated { config, .. } => {
                config.check_unique_ids()?
            }
        }
        Ok(outcome)
    }
}

impl ConfigStore for JobStore {
    fn load(&self) -> SnapfoxResult<Config> {
        Ok(self.load_with_outcome()?.into_config())
    }

    fn save(&self, config: &Config) -> SnapfoxResult<()> {
        config.check_unique_ids()?;
        write_json_atomic(&self.path, config)?;
        debug!(path = %self.path.display(), jobs = config.jobs.len(), "job store saved");
        Ok(())
    }
}
