//! Path management for Snapfox
//!
//! ## Path Resolution Order
//!
//! 1. `SNAPFOX_HOME` environment variable (if set)
//! 2. `~/.snapfox` (home directory resolved through `directories`)
//!
//! The config file location can additionally be overridden per invocation
//! with `--config` / `SNAPFOX_CONFIG`, see [`SnapfoxPaths::with_config_file`].

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::SnapfoxError;

/// Manages all paths used by Snapfox
#[derive(Debug, Clone)]
pub struct SnapfoxPaths {
    /// Base directory for Snapfox state
    base_dir: PathBuf,
    /// Explicit config file, when given on the command line
    config_file: Option<PathBuf>,
}

impl SnapfoxPaths {
    /// Create a new SnapfoxPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SnapfoxError> {
        let base_dir = if let Ok(custom) = std::env::var("SNAPFOX_HOME") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self {
            base_dir,
            config_file: None,
        })
    }

    /// Create SnapfoxPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            config_file: None,
        }
    }

    /// Use an explicit config file instead of `<base>/config.json`
    pub fn with_config_file(mut self, config_file: PathBuf) -> Self {
        self.config_file = Some(config_file);
        self
    }

    /// Get the base directory (~/.snapfox/ or equivalent)
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the job store
    pub fn config_file(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join("config.json"))
    }

    /// Get the path of the advisory lock guarding the job store
    pub fn lock_file(&self) -> PathBuf {
        let mut name = self.config_file().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }
}

/// Resolve a user-supplied path against the current directory
///
/// A leading `~/` is expanded to the home directory. The result is not
/// canonicalized, so it may name a directory that does not exist yet.
pub fn absolutize(path: &Path) -> Result<PathBuf, SnapfoxError> {
    let path = match path.strip_prefix("~") {
        Ok(rest) => {
            let dirs = BaseDirs::new().ok_or_else(|| {
                SnapfoxError::Config("Could not determine home directory".into())
            })?;
            dirs.home_dir().join(rest)
        }
        Err(_) => path.to_path_buf(),
    };

    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = std::env::current_dir()
        .map_err(|e| SnapfoxError::Io(format!("Failed to read current directory: {}", e)))?;
    Ok(cwd.join(path))
}

fn resolve_default_path() -> Result<PathBuf, SnapfoxError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| SnapfoxError::Config("Could not determine home directory".into()))?;
    Ok(dirs.home_dir().join(".snapfox"))
}
