//! FFprobe integration for media analysis.
//!
//! The pipeline needs only a small slice of what ffprobe reports: stream
//! duration, video dimensions, and the video codec name. [`FfprobeExecutor`]
//! abstracts the probe so tests can inject fixed answers.

use crate::error::{command_failed_error, command_start_error, CoreError, CoreResult};

use ffprobe::{ffprobe, FfProbeError};
use std::path::Path;

/// Media information extracted from one probe.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaInfo {
    /// Duration of the media in seconds
    pub duration: Option<f64>,
    /// Width of the first video stream
    pub width: Option<i64>,
    /// Height of the first video stream
    pub height: Option<i64>,
    /// Codec name of the first video stream (e.g. "h264")
    pub video_codec: Option<String>,
}

/// Trait for executing media probes.
pub trait FfprobeExecutor {
    /// Probes the file at `path` for the media info the pipeline consumes.
    fn media_info(&self, path: &Path) -> CoreResult<MediaInfo>;
}

/// Concrete implementation of [`FfprobeExecutor`] using the ffprobe crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn media_info(&self, path: &Path) -> CoreResult<MediaInfo> {
        log::debug!("Running ffprobe on: {}", path.display());
        match ffprobe(path) {
            Ok(metadata) => {
                let duration = metadata
                    .format
                    .duration
                    .as_deref()
                    .and_then(|d| d.parse::<f64>().ok());

                let mut info = MediaInfo {
                    duration,
                    ..Default::default()
                };

                if let Some(video_stream) = metadata
                    .streams
                    .iter()
                    .find(|s| s.codec_type.as_deref() == Some("video"))
                {
                    info.width = video_stream.width;
                    info.height = video_stream.height;
                    info.video_codec = video_stream.codec_name.clone();
                }

                Ok(info)
            }
            Err(err) => {
                log::warn!("ffprobe failed for {}: {:?}", path.display(), err);
                Err(map_ffprobe_error(err))
            }
        }
    }
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error("ffprobe", output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("unknown ffprobe error: {err:?}")),
    }
}
