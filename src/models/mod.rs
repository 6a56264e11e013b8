//! Core data models for Snapfox
//!
//! Jobs, their identifiers and the naming convention for snapshot
//! directories.

pub mod ids;
pub mod job;
pub mod snapshot;

pub use ids::JobId;
pub use job::{Job, JobValidationError, NewJob, DEFAULT_INTERVAL_HOURS, DEFAULT_MAX_SNAPSHOTS};
pub use snapshot::{slugify, snapshot_dir_name, snapshot_prefix, SnapshotRecord};
