//! Job display formatting
//!
//! Formats jobs for terminal output in table and detail views.

use chrono::{DateTime, FixedOffset};

use crate::models::{Job, SnapshotRecord};
use crate::services::schedule::{next_run, NextRun};

/// Human description of when a job runs next
pub fn format_next_run(job: &Job, now: &DateTime<FixedOffset>) -> String {
    match next_run(job) {
        NextRun::Manual => "manual".to_string(),
        NextRun::Now => "due now".to_string(),
        NextRun::At(at) if at <= *now => "due now".to_string(),
        NextRun::At(at) => at.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn format_last_run(job: &Job) -> String {
    match (job.last_run_at(), job.last_run.as_deref()) {
        (Some(at), _) => at.format("%Y-%m-%d %H:%M").to_string(),
        (None, Some(raw)) if !raw.trim().is_empty() => format!("invalid ({})", raw),
        _ => "never".to_string(),
    }
}

fn format_interval(job: &Job) -> String {
    if job.is_manual() {
        "manual".to_string()
    } else {
        format!("{}h", job.interval_hours)
    }
}

fn format_retention(job: &Job) -> String {
    if job.retention_enabled() {
        job.max_snapshots.to_string()
    } else {
        "unlimited".to_string()
    }
}

/// Format a list of jobs as a table
pub fn format_job_list(jobs: &[Job], now: &DateTime<FixedOffset>) -> String {
    if jobs.is_empty() {
        return "No backup jobs defined yet.\n".to_string();
    }

    let id_width = jobs
        .iter()
        .map(|j| j.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);

    let name_width = jobs
        .iter()
        .map(|j| j.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>id_width$}  {:<name_width$}  {:>8}  {:>9}  {:<16}  {}\n",
        "ID",
        "Name",
        "Interval",
        "Keep",
        "Last run",
        "Next run",
        id_width = id_width,
        name_width = name_width,
    ));

    output.push_str(&format!(
        "{:->id_width$}  {:-<name_width$}  {:->8}  {:->9}  {:-<16}  {:-<16}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        id_width = id_width,
        name_width = name_width,
    ));

    for job in jobs {
        output.push_str(&format!(
            "{:>id_width$}  {:<name_width$}  {:>8}  {:>9}  {:<16}  {}\n",
            job.id.to_string(),
            job.name,
            format_interval(job),
            format_retention(job),
            format_last_run(job),
            format_next_run(job, now),
            id_width = id_width,
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} job(s)\n", jobs.len()));
    output
}

/// Format a single job with its snapshots
pub fn format_job_details(
    job: &Job,
    snapshots: &[SnapshotRecord],
    now: &DateTime<FixedOffset>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Job {}: {}\n", job.id, job.name));
    let title_len = job.name.chars().count() + 6 + job.id.to_string().len();
    output.push_str(&format!("{}\n", "=".repeat(title_len)));
    output.push_str(&format!("Source:      {}\n", job.source.display()));
    output.push_str(&format!("Destination: {}\n", job.destination.display()));
    output.push_str(&format!("Interval:    {}\n", format_interval(job)));
    output.push_str(&format!("Keep:        {}\n", format_retention(job)));
    output.push_str(&format!("Last run:    {}\n", format_last_run(job)));
    output.push_str(&format!("Next run:    {}\n", format_next_run(job, now)));
    output.push_str(&format!("Prefix:      {}\n", job.snapshot_prefix()));

    output.push('\n');
    if snapshots.is_empty() {
        output.push_str("No snapshots yet.\n");
    } else {
        output.push_str(&format!("Snapshots ({}, oldest first):\n", snapshots.len()));
        for snapshot in snapshots {
            output.push_str(&format!("  {}\n", snapshot.name));
        }
    }

    output
}
