//! Run summary and per-event reporting.
//!
//! Every discovered event ends up in the [`RunSummary`] exactly once:
//! merged, skipped (with a reason), or failed (with the stage that broke).
//! The summary is what the CLI prints at the end of a run, and it
//! serializes to JSON for machine consumption.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Pipeline stage at which a job can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Inventory,
    Normalize,
    Concatenate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Inventory => write!(f, "inventory"),
            Stage::Normalize => write!(f, "normalize"),
            Stage::Concatenate => write!(f, "concatenate"),
        }
    }
}

/// Outcome of one merge job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// The event was merged into `output`.
    Merged {
        output: PathBuf,
        output_size: u64,
        elapsed_secs: f64,
    },
    /// The event was skipped (existing output, no clips).
    Skipped { reason: String },
    /// The event failed at `stage`.
    Failed { stage: Stage, reason: String },
}

/// Report for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    /// `year/<date> - <title>` label of the event.
    pub event: String,
    pub outcome: MergeOutcome,
}

/// Aggregated outcome of a whole run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub reports: Vec<MergeReport>,
}

impl RunSummary {
    pub fn merged(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, MergeOutcome::Merged { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, MergeOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, MergeOutcome::Failed { .. }))
            .count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Merge Summary:")?;
        writeln!(
            f,
            "  {} merged, {} skipped, {} failed",
            self.merged(),
            self.skipped(),
            self.failed()
        )?;
        for report in &self.reports {
            match &report.outcome {
                MergeOutcome::Merged {
                    output,
                    output_size,
                    elapsed_secs,
                } => writeln!(
                    f,
                    "  [OK]   {} -> {} ({}, {})",
                    report.event,
                    output.display(),
                    crate::util::format_bytes(*output_size),
                    crate::util::format_duration(*elapsed_secs),
                )?,
                MergeOutcome::Skipped { reason } => {
                    writeln!(f, "  [SKIP] {}: {}", report.event, reason)?
                }
                MergeOutcome::Failed { stage, reason } => {
                    writeln!(f, "  [FAIL] {} at {}: {}", report.event, stage, reason)?
                }
            }
        }
        Ok(())
    }
}
