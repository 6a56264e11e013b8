//! Interactive job management menu

use std::io::{BufRead, Write};

use chrono::{DateTime, FixedOffset, Local};
use tracing::debug;

use crate::display::{format_batch_report, format_job_list};
use crate::error::{SnapfoxError, SnapfoxResult};
use crate::models::{Job, JobId, NewJob, DEFAULT_INTERVAL_HOURS, DEFAULT_MAX_SNAPSHOTS};
use crate::services::{RsyncTool, RunMode, Runner, SyncTool};
use crate::storage::{Config, ConfigStore};

use super::prompt::Prompter;

type Clock = fn() -> DateTime<FixedOffset>;

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// The interactive menu over one loaded configuration
pub struct Menu<'a, R, W> {
    config: Config,
    store: &'a dyn ConfigStore,
    prompter: Prompter<R, W>,
    sync: Option<&'a dyn SyncTool>,
    clock: Clock,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Create a menu that saves through `store`
    pub fn new(config: Config, store: &'a dyn ConfigStore, prompter: Prompter<R, W>) -> Self {
        Self {
            config,
            store,
            prompter,
            sync: None,
            clock: local_now,
        }
    }

    /// Copy with `sync` instead of the tool named in the settings
    pub fn with_sync(mut self, sync: &'a dyn SyncTool) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Read the current time from `clock`
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current in-memory configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the menu and return its prompter
    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Show the main menu until the user exits or input ends
    pub fn run(&mut self) -> SnapfoxResult<()> {
        loop {
            self.prompter.say("=== Snapfox Backup Manager ===")?;
            self.prompter.say("1) List backup jobs")?;
            self.prompter.say("2) Add backup job")?;
            self.prompter.say("3) Edit backup job")?;
            self.prompter.say("4) Delete backup job")?;
            self.prompter.say("5) Run ALL backups now")?;
            self.prompter.say("6) Run due backups now")?;
            self.prompter.say("7) Exit")?;

            let choice = match self.prompter.read_line("Choose option: ") {
                Ok(choice) => choice,
                Err(SnapfoxError::EndOfInput) => {
                    debug!("menu input closed");
                    self.prompter.say("")?;
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
            self.prompter.say("")?;

            let result = match choice.as_str() {
                "1" => self.list_jobs(),
                "2" => self.add_job(),
                "3" => self.edit_job(),
                "4" => self.delete_job(),
                "5" => self.run_batch(RunMode::All),
                "6" => self.run_batch(RunMode::DueOnly),
                "7" | "q" | "quit" | "exit" => {
                    self.prompter.say("Bye.")?;
                    return Ok(());
                }
                _ => self.prompter.say("Unknown option, choose 1-7."),
            };

            match result {
                Ok(()) => {}
                // Input ended in the middle of a flow
                Err(SnapfoxError::EndOfInput) => {
                    debug!("menu input closed");
                    return Ok(());
                }
                Err(e @ SnapfoxError::Io(_)) => return Err(e),
                Err(e) => self.prompter.say(&format!("Error: {}", e))?,
            }
            self.prompter.say("")?;
        }
    }

    fn list_jobs(&mut self) -> SnapfoxResult<()> {
        let listing = format_job_list(&self.config.jobs, &(self.clock)());
        self.prompter.write(&listing)
    }

    fn add_job(&mut self) -> SnapfoxResult<()> {
        self.prompter.say("Add new backup job")?;
        self.prompter.say("------------------")?;

        let name = self.prompter.read_non_empty("Job name: ")?;
        let source = self.prompter.read_existing_dir("Source directory: ")?;
        let destination = self
            .prompter
            .read_dir_or_create("Destination root directory (snapshots will go inside): ")?;
        let interval_hours = self.prompter.read_u32_with_default(
            "Interval in hours between runs (0 = manual)",
            DEFAULT_INTERVAL_HOURS,
        )?;
        let max_snapshots = self.prompter.read_u32_with_default(
            "How many snapshots to keep (0 = unlimited)",
            DEFAULT_MAX_SNAPSHOTS,
        )?;

        let new_job = NewJob {
            name,
            source,
            destination,
            interval_hours,
            max_snapshots: Some(max_snapshots),
        };

        self.prompter.say("")?;
        self.prompter.say("Job summary:")?;
        self.say_job_summary(&Job::from_new(JobId::new(0), new_job.clone()))?;
        self.prompter.say("")?;

        if !self.prompter.confirm("Save this job? [y/N]: ")? {
            self.prompter.say("Job discarded.")?;
            return Ok(());
        }

        let id = self.config.add_job(new_job)?;
        self.save()?;
        self.prompter.say(&format!("Job [{}] saved.", id))
    }

    fn select_job(&mut self, action: &str) -> SnapfoxResult<Option<JobId>> {
        if self.config.jobs.is_empty() {
            self.prompter.say(&format!("No jobs to {}.", action))?;
            return Ok(None);
        }

        self.list_jobs()?;
        let answer = self
            .prompter
            .read_line(&format!("Enter job ID to {}: ", action))?;
        let Ok(id) = answer.parse::<JobId>() else {
            self.prompter.say("Invalid ID.")?;
            return Ok(None);
        };

        if self.config.find_by_id(id).is_none() {
            self.prompter.say("Job not found.")?;
            return Ok(None);
        }
        Ok(Some(id))
    }

    fn edit_job(&mut self) -> SnapfoxResult<()> {
        let Some(id) = self.select_job("edit")? else {
            return Ok(());
        };
        let mut job = self.config.get(id)?.clone();

        self.prompter.say("")?;
        self.prompter.say(&format!("Editing job {}", job))?;
        self.prompter.say("Press ENTER to keep current value.")?;

        let name = self.prompter.read_line(&format!("Name [{}]: ", job.name))?;
        if !name.is_empty() {
            job.name = name;
        }
        if let Some(source) = self
            .prompter
            .read_existing_dir_or_keep(&format!("Source directory [{}]: ", job.source.display()))?
        {
            job.source = source;
        }
        if let Some(destination) = self.prompter.read_dir_or_create_or_keep(&format!(
            "Destination root [{}]: ",
            job.destination.display()
        ))? {
            job.destination = destination;
        }
        job.interval_hours = self
            .prompter
            .read_u32_with_default("Interval hours", job.interval_hours)?;
        job.max_snapshots = self
            .prompter
            .read_u32_with_default("Keep last snapshots", job.max_snapshots)?;

        job.validate()
            .map_err(|e| SnapfoxError::Validation(e.to_string()))?;

        if let Some(slot) = self.config.find_by_id_mut(id) {
            *slot = job;
        }
        self.save()?;
        self.prompter.say("Job updated.")
    }

    fn delete_job(&mut self) -> SnapfoxResult<()> {
        let Some(id) = self.select_job("delete")? else {
            return Ok(());
        };

        let label = self.config.get(id)?.to_string();
        if !self
            .prompter
            .confirm(&format!("Delete job {}? Snapshots stay on disk. [y/N]: ", label))?
        {
            self.prompter.say("Kept.")?;
            return Ok(());
        }

        self.config.delete_by_id(id)?;
        self.save()?;
        self.prompter.say(&format!("Deleted job {}.", label))
    }

    fn run_batch(&mut self, mode: RunMode) -> SnapfoxResult<()> {
        let rsync = RsyncTool::from_settings(&self.config.settings);
        let sync: &dyn SyncTool = match self.sync {
            Some(sync) => sync,
            None => &rsync,
        };

        let now = (self.clock)();
        let report = Runner::new(sync, self.store).run_batch(&mut self.config, mode, &now)?;
        self.prompter.write(&format_batch_report(&report))
    }

    fn say_job_summary(&mut self, job: &Job) -> SnapfoxResult<()> {
        self.prompter.say(&format!("  Name:        {}", job.name))?;
        self.prompter.say(&format!("  Source:      {}", job.source.display()))?;
        self.prompter
            .say(&format!("  Destination: {}", job.destination.display()))?;
        self.prompter.say(&format!(
            "  Interval:    {}",
            if job.is_manual() {
                "manual".to_string()
            } else {
                format!("{}h", job.interval_hours)
            }
        ))?;
        self.prompter.say(&format!(
            "  Keep:        {}",
            if job.retention_enabled() {
                job.max_snapshots.to_string()
            } else {
                "unlimited".to_string()
            }
        ))
    }

    fn save(&mut self) -> SnapfoxResult<()> {
        self.store.save(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::snapshot::test_support::CopySync;
    use crate::storage::JobStore;
    use chrono::TimeZone;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    type TestMenu<'a> = Menu<'a, Cursor<Vec<u8>>, Vec<u8>>;

    fn fixed_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
            .unwrap()
    }

    fn menu<'a>(store: &'a JobStore, input: String) -> TestMenu<'a> {
        let config = store.load().unwrap();
        let prompter = Prompter::new(Cursor::new(input.into_bytes()), Vec::new());
        Menu::new(config, store, prompter).with_clock(fixed_now)
    }

    fn output(menu: TestMenu<'_>) -> String {
        String::from_utf8(menu.into_prompter().into_output()).unwrap()
    }

    #[test]
    fn test_add_job_flow_saves() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(&source).unwrap();
        let dest = temp.path().join("dst");
        let store = JobStore::new(temp.path().join("config.json"));

        let input = format!(
            "2\nPhotos\n{}\n{}\n6\n\ny\n7\n",
            source.display(),
            dest.display()
        );
        let mut m = menu(&store, input);
        m.run().unwrap();

        let saved = store.load().unwrap();
        assert_eq!(saved.jobs.len(), 1);
        assert_eq!(saved.jobs[0].name, "Photos");
        assert_eq!(saved.jobs[0].source, source);
        assert_eq!(saved.jobs[0].interval_hours, 6);
        assert_eq!(saved.jobs[0].max_snapshots, DEFAULT_MAX_SNAPSHOTS);
        assert!(dest.is_dir());

        let out = output(m);
        assert!(out.contains("Job [1] saved."));
        assert!(out.contains("Bye."));
    }

    #[test]
    fn test_add_job_discarded() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));

        let input = format!(
            "2\nDocs\n{}\n{}\n\n\nn\n7\n",
            temp.path().display(),
            temp.path().join("dst").display()
        );
        let mut m = menu(&store, input);
        m.run().unwrap();

        assert!(!store.path().exists());
        assert!(output(m).contains("Job discarded."));
    }

    #[test]
    fn test_edit_keeps_values_on_empty_input() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));
        let mut config = Config::default();
        config
            .add_job(NewJob {
                name: "Docs".into(),
                source: temp.path().to_path_buf(),
                destination: temp.path().join("dst"),
                interval_hours: 24,
                max_snapshots: None,
            })
            .unwrap();
        store.save(&config).unwrap();

        let mut m = menu(&store, "3\n1\nPapers\n\n\n\n0\n7\n".to_string());
        m.run().unwrap();

        let saved = store.load().unwrap();
        assert_eq!(saved.jobs[0].name, "Papers");
        assert_eq!(saved.jobs[0].source, temp.path());
        assert_eq!(saved.jobs[0].interval_hours, 24);
        assert_eq!(saved.jobs[0].max_snapshots, 0);
        assert!(output(m).contains("Job updated."));
    }

    #[test]
    fn test_edit_unknown_and_invalid_id() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));
        let mut config = Config::default();
        config
            .add_job(NewJob {
                name: "Docs".into(),
                source: temp.path().to_path_buf(),
                destination: temp.path().join("dst"),
                interval_hours: 24,
                max_snapshots: None,
            })
            .unwrap();
        store.save(&config).unwrap();

        let mut m = menu(&store, "3\n9\n3\nabc\n7\n".to_string());
        m.run().unwrap();

        let out = output(m);
        assert!(out.contains("Job not found."));
        assert!(out.contains("Invalid ID."));
    }

    #[test]
    fn test_delete_flow() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));
        let mut config = Config::default();
        for name in ["A", "B"] {
            config
                .add_job(NewJob {
                    name: name.into(),
                    source: temp.path().to_path_buf(),
                    destination: temp.path().join("dst"),
                    interval_hours: 24,
                    max_snapshots: None,
                })
                .unwrap();
        }
        store.save(&config).unwrap();

        let mut m = menu(&store, "4\n1\ny\n7\n".to_string());
        m.run().unwrap();

        let saved = store.load().unwrap();
        assert_eq!(saved.jobs.len(), 1);
        assert_eq!(saved.jobs[0].name, "B");
        assert_eq!(saved.next_id, Some(3));
    }

    #[test]
    fn test_run_all_from_menu() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), "hello").unwrap();
        let store = JobStore::new(temp.path().join("config.json"));

        let mut config = Config::default();
        config
            .add_job(NewJob {
                name: "Docs".into(),
                source,
                destination: temp.path().join("dst"),
                interval_hours: 0,
                max_snapshots: None,
            })
            .unwrap();
        store.save(&config).unwrap();

        let sync = CopySync::default();
        let mut m = menu(&store, "6\n5\n7\n".to_string()).with_sync(&sync);
        m.run().unwrap();

        let snapshot = temp.path().join("dst").join("docs-20260601-120000");
        assert_eq!(fs::read_to_string(snapshot.join("a.txt")).unwrap(), "hello");
        assert!(store.load().unwrap().jobs[0].last_run.is_some());

        let out = output(m);
        assert!(out.contains("not due"));
        assert!(out.contains("1 completed, 0 failed, 0 skipped"));
    }

    struct ClosedStdout;

    impl Write for ClosedStdout {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_output_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));
        let prompter = Prompter::new(Cursor::new(b"1\n7\n".to_vec()), ClosedStdout);

        let err = Menu::new(Config::default(), &store, prompter)
            .with_clock(fixed_now)
            .run()
            .unwrap_err();
        assert!(matches!(err, SnapfoxError::Io(_)));
    }

    #[test]
    fn test_eof_and_unknown_option() {
        let temp = TempDir::new().unwrap();
        let store = JobStore::new(temp.path().join("config.json"));

        let mut m = menu(&store, "9\n1\n".to_string());
        m.run().unwrap();

        let out = output(m);
        assert!(out.contains("Unknown option, choose 1-7."));
        assert!(out.contains("No backup jobs defined yet."));
    }
}
