//! Storage layer for Snapfox
//!
//! Provides the JSON job store with atomic writes, legacy schema migration and
//! an advisory lock for commands that modify the store.

pub mod file_io;
pub mod jobs;
pub mod lock;
pub mod migrate;

pub use file_io::{read_if_exists, write_json_atomic};
pub use jobs::{Config, ConfigStore, JobStore, CURRENT_SCHEMA_VERSION};
pub use lock::StoreLock;
pub use migrate::LoadOutcome;
