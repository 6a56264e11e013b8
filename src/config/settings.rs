//! Sync tool settings for Snapfox
//!
//! Settings live in the `settings` section of the job store so a single file
//! describes a whole installation. Every field has a serde default, so stores
//! written before the section existed keep loading.

use serde::{Deserialize, Serialize};

/// Settings for the external synchronization tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Program invoked to mirror a source into a snapshot
    #[serde(default = "default_sync_program")]
    pub sync_program: String,

    /// Extra arguments placed after the archive flags
    #[serde(default)]
    pub sync_extra_args: Vec<String>,
}

fn default_sync_program() -> String {
    "rsync".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sync_program: default_sync_program(),
            sync_extra_args: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.sync_program, "rsync");
        assert!(settings.sync_extra_args.is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let settings: Settings =
            serde_json::from_str(r#"{"sync_extra_args": ["--exclude=.cache"]}"#).unwrap();
        assert_eq!(settings.sync_program, "rsync");
        assert_eq!(settings.sync_extra_args, vec!["--exclude=.cache"]);
    }
}
