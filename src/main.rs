use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use snapfox::cli::{handle_job_command, handle_run, JobCommands};
use snapfox::config::paths::absolutize;
use snapfox::config::SnapfoxPaths;
use snapfox::menu::{Menu, Prompter};
use snapfox::services::RunMode;
use snapfox::storage::{ConfigStore, JobStore, LoadOutcome, StoreLock};

#[derive(Parser)]
#[command(
    name = "snapfox",
    version,
    about = "Scheduled directory snapshots with retention",
    long_about = "Snapfox mirrors source directories into timestamped snapshot \
                  directories using rsync, on a per-job schedule, and prunes \
                  the oldest snapshots beyond each job's retention limit. \
                  Run without a subcommand for the interactive menu."
)]
struct Cli {
    /// Path of the job store (default: ~/.snapfox/config.json)
    #[arg(long, global = true, env = "SNAPFOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job now, regardless of schedule
    RunAll,

    /// Run only the jobs that are due (for cron or systemd timers)
    RunDue,

    /// List jobs
    #[command(alias = "ls")]
    List,

    /// Job management commands
    #[command(subcommand)]
    Job(JobCommands),

    /// Open the interactive menu
    Menu,

    /// Show resolved paths and settings
    Config,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut paths = SnapfoxPaths::new()?;
    if let Some(config) = cli.config {
        paths = paths.with_config_file(absolutize(&config)?);
    }
    let store = JobStore::new(paths.config_file());
    let now = Local::now().fixed_offset();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::RunAll => {
            let _lock = StoreLock::acquire(paths.lock_file())?;
            handle_run(&store, RunMode::All, &now)?;
        }
        Commands::RunDue => {
            let _lock = StoreLock::acquire(paths.lock_file())?;
            handle_run(&store, RunMode::DueOnly, &now)?;
        }
        Commands::List => {
            handle_job_command(&store, JobCommands::List, &now)?;
        }
        Commands::Job(cmd) => {
            let _lock = if cmd.is_mutating() {
                Some(StoreLock::acquire(paths.lock_file())?)
            } else {
                None
            };
            handle_job_command(&store, cmd, &now)?;
        }
        Commands::Menu => {
            let _lock = StoreLock::acquire(paths.lock_file())?;
            let config = store.load()?;
            let prompter = Prompter::new(io::stdin().lock(), io::stdout());
            Menu::new(config, &store, prompter).run()?;
        }
        Commands::Config => {
            let outcome = store.load_with_outcome()?;
            let migrated = match &outcome {
                LoadOutcome::Current(_) => None,
                LoadOutcome::Migrated { from_version, .. } => Some(*from_version),
            };
            let config = outcome.into_config();

            println!("Snapfox Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Config file:    {}", paths.config_file().display());
            println!("Lock file:      {}", paths.lock_file().display());
            println!();
            println!("Schema version: {}", config.schema_version);
            if let Some(from_version) = migrated {
                println!(
                    "  (stored as version {}; upgraded on the next save)",
                    from_version
                );
            }
            println!("Jobs:           {}", config.jobs.len());
            println!();
            println!("Settings:");
            println!("  Sync program:    {}", config.settings.sync_program);
            println!(
                "  Sync extra args: {}",
                if config.settings.sync_extra_args.is_empty() {
                    "(none)".to_string()
                } else {
                    config.settings.sync_extra_args.join(" ")
                }
            );
        }
    }

    Ok(())
}
