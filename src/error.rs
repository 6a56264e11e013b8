//! Custom error types for Snapfox
//!
//! This module defines the error hierarchy for the application using thiserror.
//! Variants are grouped by how far they are allowed to propagate: store-level
//! failures abort a command, job-level failures only abort the current job, and
//! retention failures are reported as warnings.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for Snapfox operations
#[derive(Error, Debug)]
pub enum SnapfoxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Storage errors (reading or writing the config store)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Another process holds the store lock
    #[error("Store is locked: {0}")]
    Locked(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Interactive input was closed
    #[error("End of input")]
    EndOfInput,

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The job's source directory is missing or not a directory
    #[error("Source unavailable: {}: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    /// The job's destination root could not be created
    #[error("Destination uncreatable: {}: {reason}", path.display())]
    DestinationUncreatable { path: PathBuf, reason: String },

    /// The external synchronization tool failed
    #[error("Sync error: {0}")]
    Sync(String),

    /// Snapshot retention errors
    #[error("Retention error: {0}")]
    Retention(String),
}

impl SnapfoxError {
    /// Create a "not found" error for jobs
    pub fn job_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Job",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the error only affects a single job run
    ///
    /// Job-level errors are logged by the runner and never abort a batch.
    pub fn is_job_level(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::DestinationUncreatable { .. } | Self::Sync(_)
        )
    }
}

impl From<std::io::Error> for SnapfoxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for Snapfox operations
pub type SnapfoxResult<T> = Result<T, SnapfoxError>;
