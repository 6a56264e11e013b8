//! Job identifiers
//!
//! Job IDs are small integers handed out by the store's counter. On disk they
//! are written as JSON strings (`"3"`); stores that still carry bare numbers
//! are rewritten by the legacy migration in `storage::migrate`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Stable identifier of a backup job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl JobId {
    /// Create an ID from its numeric value
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The ID that follows this one, if the ID space is not exhausted
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        Ok(Self(s.parse()?))
    }
}

impl Serialize for JobId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::custom(format!("invalid job id '{}'", raw)))
    }
}
