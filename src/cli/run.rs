//! Batch run commands

use chrono::{DateTime, FixedOffset};

use crate::display::format_batch_report;
use crate::error::SnapfoxResult;
use crate::services::{BatchReport, RsyncTool, RunMode, Runner};
use crate::storage::{ConfigStore, JobStore};

/// Run a batch against the store and print the per-job results
///
/// Job failures are part of the returned report; only store failures are
/// errors.
pub fn handle_run(
    store: &JobStore,
    mode: RunMode,
    now: &DateTime<FixedOffset>,
) -> SnapfoxResult<BatchReport> {
    let mut config = store.load()?;
    let sync = RsyncTool::from_settings(&config.settings);

    let report = Runner::new(&sync, store).run_batch(&mut config, mode, now)?;
    print!("{}", format_batch_report(&report));
    Ok(report)
}
