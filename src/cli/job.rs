//! Job CLI commands
//!
//! Implements CLI commands for managing backup jobs.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::Subcommand;

use crate::config::paths::absolutize;
use crate::display::job::{format_job_details, format_job_list};
use crate::error::{SnapfoxError, SnapfoxResult};
use crate::models::{JobId, NewJob, DEFAULT_INTERVAL_HOURS};
use crate::services::RetentionPruner;
use crate::storage::{ConfigStore, JobStore};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Create a new backup job
    Add {
        /// Job name
        name: String,
        /// Directory to back up
        #[arg(short, long)]
        source: PathBuf,
        /// Directory that receives the snapshots
        #[arg(short, long)]
        dest: PathBuf,
        /// Hours between runs (0 = manual only)
        #[arg(short, long, default_value_t = DEFAULT_INTERVAL_HOURS)]
        interval: u32,
        /// Snapshots to keep (0 = unlimited, default 10)
        #[arg(short, long)]
        keep: Option<u32>,
    },
    /// List all jobs
    List,
    /// Show job details and existing snapshots
    Show {
        /// Job ID
        id: String,
    },
    /// Edit a job
    Edit {
        /// Job ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New source directory
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// New destination directory
        #[arg(short, long)]
        dest: Option<PathBuf>,
        /// New interval in hours
        #[arg(short, long)]
        interval: Option<u32>,
        /// New retention limit
        #[arg(short, long)]
        keep: Option<u32>,
    },
    /// Delete a job (existing snapshots are left on disk)
    Delete {
        /// Job ID
        id: String,
    },
}

impl JobCommands {
    /// Whether the command writes the job store
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::List | Self::Show { .. })
    }
}

/// Parse a job id given on the command line
pub fn parse_job_id(input: &str) -> SnapfoxResult<JobId> {
    input
        .parse()
        .map_err(|_| SnapfoxError::Validation(format!("Invalid job ID: '{}'", input)))
}

/// Handle a job command
pub fn handle_job_command(
    store: &JobStore,
    cmd: JobCommands,
    now: &DateTime<FixedOffset>,
) -> SnapfoxResult<()> {
    let mut config = store.load()?;

    match cmd {
        JobCommands::Add {
            name,
            source,
            dest,
            interval,
            keep,
        } => {
            let id = config.add_job(NewJob {
                name,
                source: absolutize(&source)?,
                destination: absolutize(&dest)?,
                interval_hours: interval,
                max_snapshots: keep,
            })?;
            store.save(&config)?;

            let job = config.get(id)?;
            println!("Created job: {}", job.name);
            println!("  ID: {}", job.id);
            println!("  Source: {}", job.source.display());
            println!("  Destination: {}", job.destination.display());
            if !job.source.is_dir() {
                println!("  Warning: source does not exist yet; runs will fail until it does");
            }
        }

        JobCommands::List => {
            print!("{}", format_job_list(&config.jobs, now));
        }

        JobCommands::Show { id } => {
            let job = config.get(parse_job_id(&id)?)?;
            let snapshots = RetentionPruner::new().list_snapshots(job)?;
            print!("{}", format_job_details(job, &snapshots, now));
        }

        JobCommands::Edit {
            id,
            name,
            source,
            dest,
            interval,
            keep,
        } => {
            if name.is_none()
                && source.is_none()
                && dest.is_none()
                && interval.is_none()
                && keep.is_none()
            {
                println!(
                    "No changes specified. Use --name, --source, --dest, --interval or --keep."
                );
                return Ok(());
            }

            let id = parse_job_id(&id)?;
            let job = config
                .find_by_id_mut(id)
                .ok_or_else(|| SnapfoxError::job_not_found(id.to_string()))?;

            if let Some(name) = name {
                job.name = name.trim().to_string();
            }
            if let Some(source) = source {
                job.source = absolutize(&source)?;
            }
            if let Some(dest) = dest {
                job.destination = absolutize(&dest)?;
            }
            if let Some(interval) = interval {
                job.interval_hours = interval;
            }
            if let Some(keep) = keep {
                job.max_snapshots = keep;
            }
            job.validate()
                .map_err(|e| SnapfoxError::Validation(e.to_string()))?;

            let label = job.to_string();
            store.save(&config)?;
            println!("Updated job: {}", label);
        }

        JobCommands::Delete { id } => {
            let removed = config.delete_by_id(parse_job_id(&id)?)?;
            store.save(&config)?;
            println!("Deleted job: {}", removed);
            println!(
                "  Snapshots under {} were left in place.",
                removed.destination.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
            .unwrap()
    }

    fn add(store: &JobStore, name: &str, temp: &TempDir) {
        handle_job_command(
            store,
            JobCommands::Add {
                name: name.into(),
                source: temp.path().join("src"),
                dest: temp.path().join("dst"),
                interval: 12,
                keep: None,
            },
            &now(),
        )
        .unwrap();
    }

    #[test]
    fn test_add_edit_delete() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));

        add(&store, "Photos", &temp);
        add(&store, "Docs", &temp);

        let config = store.load().unwrap();
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[0].interval_hours, 12);
        assert_eq!(config.jobs[0].max_snapshots, 10);

        handle_job_command(
            &store,
            JobCommands::Edit {
                id: "1".into(),
                name: Some("Pictures".into()),
                source: None,
                dest: None,
                interval: Some(0),
                keep: Some(3),
            },
            &now(),
        )
        .unwrap();

        let config = store.load().unwrap();
        assert_eq!(config.jobs[0].name, "Pictures");
        assert!(config.jobs[0].is_manual());
        assert_eq!(config.jobs[0].max_snapshots, 3);

        handle_job_command(&store, JobCommands::Delete { id: "1".into() }, &now()).unwrap();
        add(&store, "Music", &temp);

        let config = store.load().unwrap();
        let ids: Vec<u64> = config.jobs.iter().map(|j| j.id.value()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_unknown_and_invalid_ids() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));

        let err = handle_job_command(&store, JobCommands::Delete { id: "7".into() }, &now())
            .unwrap_err();
        assert!(err.is_not_found());

        let err = handle_job_command(&store, JobCommands::Show { id: "abc".into() }, &now())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_edit_rejects_empty_name() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));
        add(&store, "Photos", &temp);

        let err = handle_job_command(
            &store,
            JobCommands::Edit {
                id: "1".into(),
                name: Some("   ".into()),
                source: None,
                dest: None,
                interval: None,
                keep: None,
            },
            &now(),
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.load().unwrap().jobs[0].name, "Photos");
    }

    #[test]
    fn test_mutating_commands() {
        assert!(!JobCommands::List.is_mutating());
        assert!(!JobCommands::Show { id: "1".into() }.is_mutating());
        assert!(JobCommands::Delete { id: "1".into() }.is_mutating());
    }
}
