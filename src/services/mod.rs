//! Service layer for Snapfox
//!
//! The scheduling and retention engine: due-ness, snapshot execution,
//! pruning and batch orchestration on top of the storage layer.

pub mod retention;
pub mod runner;
pub mod schedule;
pub mod snapshot;

pub use retention::{PruneReport, RetentionPruner};
pub use runner::{BatchReport, JobOutcome, JobReport, RunMode, Runner};
pub use schedule::{is_due, next_run, NextRun};
pub use snapshot::{RsyncTool, SnapshotExecutor, SnapshotOutcome, SyncTool};
