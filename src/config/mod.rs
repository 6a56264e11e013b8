//! Configuration module for Snapfox
//!
//! This module provides configuration management including:
//! - Path resolution for the job store and its lock file
//! - Settings for the external synchronization tool

pub mod paths;
pub mod settings;

pub use paths::SnapfoxPaths;
pub use settings::Settings;
