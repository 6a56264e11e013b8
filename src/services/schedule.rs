//! Due-ness of scheduled jobs
//!
//! Pure functions over a job and the current time; no I/O.

use chrono::{DateTime, Duration, FixedOffset};

use crate::models::Job;

/// When a job becomes eligible to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextRun {
    /// Interval is 0; only explicit runs
    Manual,
    /// Never ran successfully (or the recorded time is unreadable)
    Now,
    /// Due from this instant on
    At(DateTime<FixedOffset>),
}

/// Compute when `job` is next due
pub fn next_run(job: &Job) -> NextRun {
    if job.is_manual() {
        return NextRun::Manual;
    }

    let Some(last_run) = job.last_run_at() else {
        return NextRun::Now;
    };

    // Past the end of representable time is the same as never
    match last_run.checked_add_signed(Duration::hours(i64::from(job.interval_hours))) {
        Some(at) => NextRun::At(at),
        None => NextRun::Manual,
    }
}

/// Whether `job` should run at `now`
///
/// Exactly on time counts as due.
pub fn is_due(job: &Job, now: &DateTime<FixedOffset>) -> bool {
    match next_run(job) {
        NextRun::Manual => false,
        NextRun::Now => true,
        NextRun::At(at) => *now >= at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobId, NewJob};
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn job(interval_hours: u32, last_run: Option<&str>) -> Job {
        let mut job = Job::from_new(
            JobId::new(1),
            NewJob {
                name: "docs".into(),
                source: PathBuf::from("/src"),
                destination: PathBuf::from("/dst"),
                interval_hours,
                max_snapshots: None,
            },
        );
        job.last_run = last_run.map(str::to_string);
        job
    }

    fn sample_instants() -> Vec<DateTime<FixedOffset>> {
        let utc = FixedOffset::east_opt(0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        vec![
            utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap(),
            utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap(),
            tokyo.with_ymd_and_hms(2026, 10, 16, 23, 59, 59).unwrap(),
            utc.with_ymd_and_hms(2199, 12, 31, 0, 0, 0).unwrap(),
        ]
    }

    #[test]
    fn test_manual_jobs_are_never_due() {
        for last_run in [None, Some(""), Some("garbage"), Some("2020-01-01T00:00:00Z")] {
            let job = job(0, last_run);
            for now in sample_instants() {
                assert!(!is_due(&job, &now), "last_run={:?} now={}", last_run, now);
            }
            assert_eq!(next_run(&job), NextRun::Manual);
        }
    }

    #[test]
    fn test_never_run_jobs_are_always_due() {
        for last_run in [None, Some(""), Some("  "), Some("2020-13-45"), Some("yesterday")] {
            for interval in [1, 24, 24 * 365] {
                let job = job(interval, last_run);
                for now in sample_instants() {
                    assert!(is_due(&job, &now), "last_run={:?} now={}", last_run, now);
                }
            }
        }
    }

    #[test]
    fn test_due_exactly_at_interval_boundary() {
        let job = job(6, Some("2026-03-01T10:00:00+01:00"));
        let offset = FixedOffset::east_opt(3600).unwrap();
        let boundary = offset.with_ymd_and_hms(2026, 3, 1, 16, 0, 0).unwrap();

        assert_eq!(next_run(&job), NextRun::At(boundary));
        assert!(is_due(&job, &boundary));
        assert!(!is_due(&job, &(boundary - Duration::seconds(1))));
        assert!(is_due(&job, &(boundary + Duration::days(30))));
    }

    #[test]
    fn test_boundary_across_offsets() {
        let job = job(1, Some("2026-03-01T10:00:00+00:00"));
        let cet = FixedOffset::east_opt(3600).unwrap();

        // 11:00 UTC is 12:00 in UTC+1
        let at = cet.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert!(is_due(&job, &at));
        assert!(!is_due(&job, &(at - Duration::seconds(1))));
    }
}
