//! Per-clip format normalization.
//!
//! The legacy interlaced camera format (.mts/.m2ts, AVCHD) cannot be safely
//! stream-copied into a concat list: frame timing and field order are
//! unreliable across clips. Those clips are deinterlaced and re-encoded to
//! H.264/AAC in MP4 before joining. Everything else passes through untouched,
//! preserving the original quality and skipping the CPU cost.
//!
//! Resolution is the one other thing normalization may touch: clips whose
//! dimensions differ from the event's leading clip are scaled during
//! normalization, because the join cannot reconcile mixed dimensions later.

use crate::error::{CoreError, CoreResult};
use crate::external::{run_ffmpeg, FfmpegSpawner, FfprobeExecutor};
use crate::inventory::ClipDescriptor;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};

/// Container/codec family of a clip, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFamily {
    Mp4,
    Matroska,
    Avi,
    QuickTime,
    Wmv,
    /// Legacy interlaced camera format (.mts/.m2ts).
    LegacyInterlaced,
}

/// Detects the codec family from a path's extension. Returns `None` for
/// unrecognized extensions.
pub fn detect_family(path: &Path) -> Option<CodecFamily> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" => Some(CodecFamily::Mp4),
        "mkv" => Some(CodecFamily::Matroska),
        "avi" => Some(CodecFamily::Avi),
        "mov" => Some(CodecFamily::QuickTime),
        "wmv" => Some(CodecFamily::Wmv),
        "mts" | "m2ts" => Some(CodecFamily::LegacyInterlaced),
        _ => None,
    }
}

/// Capability check: does this family require a re-encode before it can be
/// concatenated? True only for the legacy interlaced family.
pub fn needs_reencode(family: CodecFamily) -> bool {
    matches!(family, CodecFamily::LegacyInterlaced)
}

/// Video dimensions of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// A clip ready for concatenation.
#[derive(Debug, Clone)]
pub struct NormalizedClip {
    /// Path to feed the concatenator: the original file for passthrough
    /// clips, an intermediate inside the job temp dir otherwise.
    pub path: PathBuf,
    /// Family after normalization (re-encoded clips become Mp4).
    pub family: CodecFamily,
    /// Probed duration in seconds, when available.
    pub duration_secs: Option<f64>,
}

fn probe_resolution(info_width: Option<i64>, info_height: Option<i64>) -> Option<Resolution> {
    match (info_width, info_height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some(Resolution {
            width: w as u32,
            height: h as u32,
        }),
        _ => None,
    }
}

/// Normalizes every clip of one event, in order.
///
/// The first clip with probe data fixes the event's target resolution;
/// later clips that deviate are scaled. Probe failures on passthrough clips
/// degrade to a warning (the clip is assumed uniform) — a missing probe
/// never forces a re-encode.
pub fn normalize_clips<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    clips: &[ClipDescriptor],
    work_dir: &Path,
) -> CoreResult<Vec<NormalizedClip>> {
    let mut target: Option<Resolution> = None;
    let mut normalized = Vec::with_capacity(clips.len());

    for clip in clips {
        let info = match prober.media_info(&clip.source) {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("Probe failed for {}: {}", clip.source.display(), e);
                None
            }
        };
        let resolution = info
            .as_ref()
            .and_then(|i| probe_resolution(i.width, i.height));
        let duration_secs = info.as_ref().and_then(|i| i.duration);
        if target.is_none() {
            target = resolution;
        }
        let scale_to = match (resolution, target) {
            (Some(res), Some(target)) if res != target => Some(target),
            _ => None,
        };

        let result = normalize_clip(spawner, clip, scale_to, work_dir, duration_secs)?;
        normalized.push(result);
    }

    Ok(normalized)
}

fn normalize_clip<S: FfmpegSpawner>(
    spawner: &S,
    clip: &ClipDescriptor,
    scale_to: Option<Resolution>,
    work_dir: &Path,
    duration_secs: Option<f64>,
) -> CoreResult<NormalizedClip> {
    if !clip.needs_reencode && scale_to.is_none() {
        log::debug!("Passing through {}", clip.source.display());
        return Ok(NormalizedClip {
            path: clip.source.clone(),
            family: clip.family,
            duration_secs,
        });
    }

    let output = work_dir.join(format!("{:04}_normalized.mp4", clip.index));

    let mut filters: Vec<String> = Vec::new();
    if clip.needs_reencode {
        log::info!("Re-encoding legacy clip {}", clip.source.display());
        filters.push("yadif".to_string());
    }
    if let Some(target) = scale_to {
        log::info!(
            "Scaling {} to {}x{}",
            clip.source.display(),
            target.width,
            target.height
        );
        filters.push(format!(
            "scale={}:{}:force_original_aspect_ratio=decrease",
            target.width, target.height
        ));
    }

    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(clip.source.to_string_lossy().as_ref());
    cmd.arg("-vf");
    cmd.arg(filters.join(","));
    cmd.args(["-c:v", "libx264", "-preset", "fast"]);
    cmd.args(["-c:a", "aac"]);
    cmd.output(output.to_string_lossy().as_ref());

    run_ffmpeg(spawner, cmd, "normalize").map_err(|e| CoreError::Normalization {
        clip: clip.source.clone(),
        message: e.to_string(),
    })?;

    Ok(NormalizedClip {
        path: output,
        family: CodecFamily::Mp4,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_families_case_insensitively() {
        assert_eq!(detect_family(Path::new("a.MP4")), Some(CodecFamily::Mp4));
        assert_eq!(detect_family(Path::new("a.mkv")), Some(CodecFamily::Matroska));
        assert_eq!(
            detect_family(Path::new("a.MTS")),
            Some(CodecFamily::LegacyInterlaced)
        );
        assert_eq!(
            detect_family(Path::new("a.m2ts")),
            Some(CodecFamily::LegacyInterlaced)
        );
        assert_eq!(detect_family(Path::new("a.txt")), None);
        assert_eq!(detect_family(Path::new("noext")), None);
    }

    #[test]
    fn only_legacy_needs_reencode() {
        assert!(needs_reencode(CodecFamily::LegacyInterlaced));
        assert!(!needs_reencode(CodecFamily::Mp4));
        assert!(!needs_reencode(CodecFamily::Matroska));
        assert!(!needs_reencode(CodecFamily::Avi));
        assert!(!needs_reencode(CodecFamily::QuickTime));
        assert!(!needs_reencode(CodecFamily::Wmv));
    }
}
