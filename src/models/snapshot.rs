//! Snapshot naming
//!
//! Every run writes into `<slug>-<YYYYMMDD-HHMMSS>` under the job's
//! destination root. The timestamp is UTC and fixed width, so sorting names
//! sorts snapshots chronologically even across daylight saving changes.
//! Retention trusts this convention completely: there is no snapshot index
//! besides the directory listing.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Separator between the slug and the timestamp
pub const SNAPSHOT_SEPARATOR: char = '-';

/// strftime format of the timestamp suffix
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Length of a rendered timestamp suffix
const TIMESTAMP_LEN: usize = 15;

/// A snapshot directory found under a job's destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Directory name
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Timestamp parsed from the name (UTC)
    pub taken_at: NaiveDateTime,
}

/// Derive a filesystem-safe slug from a job name
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' => '-',
            c => c,
        })
        .collect()
}

/// Prefix shared by all snapshot directories of a job
pub fn snapshot_prefix(job_name: &str) -> String {
    format!("{}{}", slugify(job_name), SNAPSHOT_SEPARATOR)
}

/// Directory name for a snapshot taken at `at`
///
/// The suffix is rendered in UTC whatever the offset of `at`.
pub fn snapshot_dir_name(job_name: &str, at: &DateTime<FixedOffset>) -> String {
    format!(
        "{}{}",
        snapshot_prefix(job_name),
        at.with_timezone(&Utc).format(SNAPSHOT_TIMESTAMP_FORMAT)
    )
}

/// Parse the timestamp out of a snapshot directory name
///
/// Returns `None` if the name does not carry `prefix` or its suffix is not a
/// well-formed `YYYYMMDD-HHMMSS` timestamp.
pub fn parse_snapshot_name(dir_name: &str, prefix: &str) -> Option<NaiveDateTime> {
    parse_snapshot_timestamp(dir_name.strip_prefix(prefix)?)
}

/// Parse a `YYYYMMDD-HHMMSS` timestamp
pub fn parse_snapshot_timestamp(stamp: &str) -> Option<NaiveDateTime> {
    let well_formed = stamp.len() == TIMESTAMP_LEN
        && stamp.bytes().enumerate().all(|(i, b)| match i {
            8 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }

    let (date_part, time_part) = (&stamp[0..8], &stamp[9..]);

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    Some(NaiveDateTime::new(date, time))
}
