//! Batch report formatting

use crate::services::{BatchReport, JobOutcome};

/// Format the per-job results of a batch and a summary line
pub fn format_batch_report(report: &BatchReport) -> String {
    if report.jobs.is_empty() {
        return "No jobs to run.\n".to_string();
    }

    let mut output = String::new();
    for job in &report.jobs {
        match &job.outcome {
            JobOutcome::Completed {
                snapshot_dir,
                pruned,
                retention_warnings,
            } => {
                output.push_str(&format!(
                    "[{}] {}: snapshot {}",
                    job.id,
                    job.name,
                    snapshot_dir.display()
                ));
                if *pruned > 0 {
                    output.push_str(&format!(" (removed {} old)", pruned));
                }
                output.push('\n');
                for warning in retention_warnings {
                    output.push_str(&format!("    warning: {}\n", warning));
                }
            }
            JobOutcome::Skipped => {
                output.push_str(&format!("[{}] {}: not due\n", job.id, job.name));
            }
            JobOutcome::Failed(reason) => {
                output.push_str(&format!("[{}] {}: FAILED: {}\n", job.id, job.name, reason));
            }
        }
    }

    output.push_str(&format!(
        "\n{} completed, {} failed, {} skipped\n",
        report.completed(),
        report.failed(),
        report.skipped()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobId;
    use crate::services::JobReport;
    use std::path::PathBuf;

    #[test]
    fn test_empty_report() {
        assert_eq!(format_batch_report(&BatchReport::default()), "No jobs to run.\n");
    }

    #[test]
    fn test_mixed_report() {
        let report = BatchReport {
            jobs: vec![
                JobReport {
                    id: JobId::new(1),
                    name: "A".into(),
                    outcome: JobOutcome::Completed {
                        snapshot_dir: PathBuf::from("/dst/a-20260601-120000"),
                        pruned: 2,
                        retention_warnings: vec!["/dst/a-old: busy".into()],
                    },
                },
                JobReport {
                    id: JobId::new(2),
                    name: "B".into(),
                    outcome: JobOutcome::Failed("source unavailable".into()),
                },
                JobReport {
                    id: JobId::new(3),
                    name: "C".into(),
                    outcome: JobOutcome::Skipped,
                },
            ],
        };

        let output = format_batch_report(&report);
        assert!(output.contains("[1] A: snapshot /dst/a-20260601-120000 (removed 2 old)"));
        assert!(output.contains("    warning: /dst/a-old: busy"));
        assert!(output.contains("[2] B: FAILED: source unavailable"));
        assert!(output.contains("[3] C: not due"));
        assert!(output.ends_with("1 completed, 1 failed, 1 skipped\n"));
    }
}
