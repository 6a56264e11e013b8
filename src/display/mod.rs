//! Display formatting for terminal output
//!
//! Provides utilities for formatting jobs and batch results for terminal
//! display.

pub mod job;
pub mod report;

pub use job::{format_job_details, format_job_list, format_next_run};
pub use report::format_batch_report;
