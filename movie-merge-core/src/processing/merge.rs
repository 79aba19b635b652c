//! Main merge orchestration.
//!
//! Each discovered event becomes one merge job: inventory → normalize →
//! concatenate, strictly in that order, because every stage depends on the
//! previous one's output. Jobs are independent — each owns its clip list,
//! its temp dir, and its output path — so up to N of them run in parallel
//! on a dedicated rayon pool. A job failure is recorded in the summary and
//! never cancels or blocks sibling jobs.
//!
//! Jobs have no timeout: long transcodes are legitimate. The known risk is
//! that one stuck external process occupies one of the N workers until it
//! exits.

use crate::classify::sanitize_title;
use crate::concat::{concatenate, select_join_mode, OverwritePolicy};
use crate::discovery::EventFolder;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::inventory::list_clips;
use crate::normalize::{normalize_clips, NormalizedClip};
use crate::report::{MergeOutcome, MergeReport, RunSummary, Stage};
use crate::temp_files;

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default number of concurrent merge jobs.
pub const DEFAULT_WORKERS: usize = 2;

/// Duration drift tolerated per clip at the join boundaries, in seconds.
const JOIN_SLACK_SECS: f64 = 0.5;

/// Configuration for one merge run.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Root of the input collection (`<root>/<year>/<date> - <title>/`).
    pub input_root: PathBuf,
    /// Root the output tree is mirrored under.
    pub output_root: PathBuf,
    /// Years to process; empty means all years.
    pub years: BTreeSet<i32>,
    /// Maximum number of merge jobs in flight.
    pub workers: usize,
    /// Behavior when an output file already exists.
    pub overwrite: OverwritePolicy,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("."),
            output_root: PathBuf::from("."),
            years: BTreeSet::new(),
            workers: DEFAULT_WORKERS,
            overwrite: OverwritePolicy::default(),
        }
    }
}

/// Runs merge jobs for the given events on a pool of `config.workers`
/// threads and collects every outcome into a [`RunSummary`].
///
/// Per-event failures are captured in the summary; the only errors this
/// function itself returns are environmental (the worker pool could not be
/// built).
pub fn merge_events<S, P>(
    spawner: &S,
    prober: &P,
    config: &MergeConfig,
    events: Vec<EventFolder>,
) -> CoreResult<RunSummary>
where
    S: FfmpegSpawner + Sync,
    P: FfprobeExecutor + Sync,
{
    if events.is_empty() {
        log::info!("No event folders to process.");
        return Ok(RunSummary::default());
    }

    let workers = config.workers.max(1);
    log::info!(
        "Merging {} event(s) with {} worker(s)",
        events.len(),
        workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| CoreError::Other(format!("Failed to build worker pool: {e}")))?;

    let reports: Vec<MergeReport> = pool.install(|| {
        events
            .par_iter()
            .map(|event| merge_one(spawner, prober, config, event))
            .collect()
    });

    Ok(RunSummary { reports })
}

/// Resolved output path for one event: mirrors the input layout under the
/// output root, named from the event's date and sanitized title.
pub fn output_path_for(config: &MergeConfig, event: &EventFolder) -> PathBuf {
    config
        .output_root
        .join(event.year.to_string())
        .join(format!(
            "{} - {}.mp4",
            event.date.format("%Y-%m-%d"),
            sanitize_title(&event.title)
        ))
}

fn merge_one<S, P>(
    spawner: &S,
    prober: &P,
    config: &MergeConfig,
    event: &EventFolder,
) -> MergeReport
where
    S: FfmpegSpawner + Sync,
    P: FfprobeExecutor + Sync,
{
    let label = event.label();
    let outcome = run_stages(spawner, prober, config, event);
    match &outcome {
        MergeOutcome::Merged { output, .. } => {
            log::info!("Merged {} -> {}", label, output.display());
        }
        MergeOutcome::Skipped { reason } => {
            log::info!("Skipping {}: {}", label, reason);
        }
        MergeOutcome::Failed { stage, reason } => {
            log::error!("Failed {} at {}: {}", label, stage, reason);
        }
    }
    MergeReport {
        event: label,
        outcome,
    }
}

fn run_stages<S, P>(
    spawner: &S,
    prober: &P,
    config: &MergeConfig,
    event: &EventFolder,
) -> MergeOutcome
where
    S: FfmpegSpawner + Sync,
    P: FfprobeExecutor + Sync,
{
    let started = Instant::now();
    let output_path = output_path_for(config, event);

    if output_path.exists() && config.overwrite == OverwritePolicy::Skip {
        return MergeOutcome::Skipped {
            reason: format!("output {} already exists", output_path.display()),
        };
    }

    let clips = match list_clips(event) {
        Ok(clips) => clips,
        Err(CoreError::EmptyEvent(_)) => {
            return MergeOutcome::Skipped {
                reason: "no eligible clips".to_string(),
            }
        }
        Err(e) => {
            return MergeOutcome::Failed {
                stage: Stage::Inventory,
                reason: e.to_string(),
            }
        }
    };
    log::info!("Processing {} ({} clips)", event.label(), clips.len());

    // Intermediates live in a per-job temp dir, released on every exit path.
    let work_dir = match temp_files::create_temp_dir(&config.output_root, "movie_merge") {
        Ok(dir) => dir,
        Err(e) => {
            return MergeOutcome::Failed {
                stage: Stage::Normalize,
                reason: e.to_string(),
            }
        }
    };

    let normalized = match normalize_clips(spawner, prober, &clips, work_dir.path()) {
        Ok(normalized) => normalized,
        Err(e) => {
            return MergeOutcome::Failed {
                stage: Stage::Normalize,
                reason: e.to_string(),
            }
        }
    };

    let mode = select_join_mode(&normalized);
    log::debug!("Join mode for {}: {:?}", event.label(), mode);

    if let Err(e) = concatenate(spawner, event, &normalized, &output_path, mode, work_dir.path()) {
        return MergeOutcome::Failed {
            stage: Stage::Concatenate,
            reason: e.to_string(),
        };
    }

    let _ = validate_duration(prober, &normalized, &output_path);

    let output_size = std::fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0);
    MergeOutcome::Merged {
        output: output_path,
        output_size,
        elapsed_secs: started.elapsed().as_secs_f64(),
    }
}

/// Compares the joined output's duration against the sum of its inputs.
///
/// Advisory only: probe data can be missing for exotic containers, so an
/// unverifiable join passes. A confirmed mismatch beyond the per-boundary
/// slack is logged and returns false; it never fails the job.
fn validate_duration<P: FfprobeExecutor>(prober: &P, clips: &[NormalizedClip], output: &Path) -> bool {
    let inputs: Vec<f64> = clips.iter().filter_map(|c| c.duration_secs).collect();
    if inputs.len() != clips.len() {
        log::debug!(
            "Skipping duration validation for {}: missing input durations",
            output.display()
        );
        return true;
    }
    let expected: f64 = inputs.iter().sum();

    let actual = match prober.media_info(output) {
        Ok(info) => info.duration,
        Err(e) => {
            log::debug!("Could not probe joined output {}: {}", output.display(), e);
            return true;
        }
    };
    let Some(actual) = actual else { return true };

    let tolerance = JOIN_SLACK_SECS * clips.len() as f64;
    if (actual - expected).abs() > tolerance {
        log::warn!(
            "Joined output {} duration {:.2}s deviates from expected {:.2}s",
            output.display(),
            actual,
            expected
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::MediaInfo;
    use crate::normalize::CodecFamily;
    use std::path::PathBuf;

    struct FixedProber {
        duration: Option<f64>,
    }

    impl FfprobeExecutor for FixedProber {
        fn media_info(&self, _path: &Path) -> crate::CoreResult<MediaInfo> {
            Ok(MediaInfo {
                duration: self.duration,
                ..Default::default()
            })
        }
    }

    fn clips_with_durations(durations: &[Option<f64>]) -> Vec<NormalizedClip> {
        durations
            .iter()
            .map(|d| NormalizedClip {
                path: PathBuf::from("/in/clip.mp4"),
                family: CodecFamily::Mp4,
                duration_secs: *d,
            })
            .collect()
    }

    #[test]
    fn joined_duration_matching_the_input_sum_passes() {
        let clips = clips_with_durations(&[Some(8.0), Some(4.0)]);
        let prober = FixedProber {
            duration: Some(12.3),
        };
        assert!(validate_duration(&prober, &clips, Path::new("/out/a.mp4")));
    }

    #[test]
    fn joined_duration_far_from_the_input_sum_fails() {
        let clips = clips_with_durations(&[Some(8.0), Some(4.0)]);
        let prober = FixedProber {
            duration: Some(20.0),
        };
        assert!(!validate_duration(&prober, &clips, Path::new("/out/a.mp4")));
    }

    #[test]
    fn unverifiable_joins_pass() {
        // Missing input duration
        let clips = clips_with_durations(&[Some(8.0), None]);
        let prober = FixedProber {
            duration: Some(20.0),
        };
        assert!(validate_duration(&prober, &clips, Path::new("/out/a.mp4")));

        // Missing output duration
        let clips = clips_with_durations(&[Some(8.0), Some(4.0)]);
        let prober = FixedProber { duration: None };
        assert!(validate_duration(&prober, &clips, Path::new("/out/a.mp4")));
    }
}
