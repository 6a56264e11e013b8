//! Snapfox - scheduled directory snapshots with retention
//!
//! Snapfox keeps a list of backup jobs, each pairing a source directory with
//! a destination root. A run mirrors the source into a fresh timestamped
//! directory under the destination using an external sync tool (rsync) and
//! then deletes the oldest snapshots beyond the job's retention limit.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and settings
//! - `error`: Custom error types
//! - `models`: Jobs, job identifiers and snapshot naming
//! - `storage`: JSON job store with atomic writes, migration and locking
//! - `services`: Scheduling, snapshot execution, retention and batch runs
//! - `cli`: Command handlers for the `snapfox` binary
//! - `display`: Terminal formatting
//! - `menu`: Interactive job management
//!
//! # Example
//!
//! ```rust,ignore
//! use snapfox::config::SnapfoxPaths;
//! use snapfox::services::{RsyncTool, RunMode, Runner};
//! use snapfox::storage::{ConfigStore, JobStore};
//!
//! let paths = SnapfoxPaths::new()?;
//! let store = JobStore::new(paths.config_file());
//! let mut config = store.load()?;
//! let sync = RsyncTool::from_settings(&config.settings);
//! let now = chrono::Local::now().fixed_offset();
//! let report = Runner::new(&sync, &store).run_batch(&mut config, RunMode::DueOnly, &now)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod menu;
pub mod models;
pub mod services;
pub mod storage;

pub use error::SnapfoxError;
