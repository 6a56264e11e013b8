//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod job;
pub mod run;

pub use job::{handle_job_command, parse_job_id, JobCommands};
pub use run::handle_run;
