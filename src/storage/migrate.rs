//! Schema migration for the job store
//!
//! The canonical schema is version 2. Version 1 stores differ in two ways:
//! job IDs are bare JSON numbers, and the retention limit may be named
//! `keep_last` instead of `max_snapshots`. Older stores are upgraded in memory
//! once at load time; the next save writes the canonical shape.

use serde_json::{Map, Value};

use super::jobs::{Config, CURRENT_SCHEMA_VERSION};

/// Result of parsing a job store
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file already matched the current schema
    Current(Config),
    /// The file was upgraded from an older schema
    Migrated { config: Config, from_version: u32 },
}

impl LoadOutcome {
    /// The parsed configuration
    pub fn into_config(self) -> Config {
        match self {
            Self::Current(config) | Self::Migrated { config, .. } => config,
        }
    }

    /// Whether a migration was applied
    pub fn was_migrated(&self) -> bool {
        matches!(self, Self::Migrated { .. })
    }
}

/// Parse store contents, upgrading legacy documents first
///
/// Any document declaring a schema version below the current one (or none)
/// goes through the migration even if it would also parse as-is, so legacy
/// fields such as `keep_last` are never dropped silently. If the migration
/// cannot produce a valid document, the error of the strict parse is
/// returned.
pub fn parse_config(contents: &str) -> Result<LoadOutcome, serde_json::Error> {
    match migrate_legacy(contents) {
        Some(migrated) => Ok(migrated),
        None => serde_json::from_str::<Config>(contents).map(LoadOutcome::Current),
    }
}

fn migrate_legacy(contents: &str) -> Option<LoadOutcome> {
    let mut raw: Value = serde_json::from_str(contents).ok()?;
    let root = raw.as_object_mut()?;

    let from_version = root
        .get("schema_version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1);
    if from_version >= CURRENT_SCHEMA_VERSION {
        return None;
    }

    let jobs = root.get_mut("jobs")?;
    if jobs.is_null() {
        *jobs = Value::Array(Vec::new());
    }
    for job in jobs.as_array_mut()? {
        if let Some(fields) = job.as_object_mut() {
            upgrade_job(fields);
        }
    }

    root.insert(
        "schema_version".to_string(),
        Value::from(CURRENT_SCHEMA_VERSION),
    );

    let config: Config = serde_json::from_value(raw).ok()?;
    Some(LoadOutcome::Migrated {
        config,
        from_version,
    })
}

fn upgrade_job(fields: &mut Map<String, Value>) {
    // 1 -> "1"
    if let Some(Value::Number(n)) = fields.get("id") {
        let text = match n.as_u64() {
            Some(v) => v.to_string(),
            None => format!("{:.0}", n.as_f64().unwrap_or_default()),
        };
        fields.insert("id".to_string(), Value::String(text));
    }

    if !fields.contains_key("max_snapshots") {
        if let Some(keep) = fields.remove("keep_last") {
            fields.insert("max_snapshots".to_string(), keep);
        }
    }

    // Negative counts meant "off" in the old format
    for key in ["interval_hours", "max_snapshots"] {
        if let Some(Value::Number(n)) = fields.get(key) {
            if n.as_i64().is_some_and(|v| v < 0) {
                fields.insert(key.to_string(), Value::from(0));
            }
        }
    }

    if matches!(fields.get("last_run"), Some(Value::Null)) {
        fields.remove("last_run");
    }
}
