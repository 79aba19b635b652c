//! Clip concatenation.
//!
//! Joins the ordered, normalized clips of one event into a single MP4 using
//! ffmpeg's concat demuxer. When every clip shares one codec family the join
//! is a pure stream copy (no re-encode, no quality loss); mixed inputs fall
//! back to a transcoding join. The output is written under a `temp_` name
//! and renamed into place on success, so a crash or failure never leaves a
//! half-written file at the final path.

use crate::discovery::EventFolder;
use crate::error::{CoreError, CoreResult};
use crate::external::{run_ffmpeg, FfmpegSpawner};
use crate::normalize::NormalizedClip;
use crate::util::get_filename_safe;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How the clips are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Lossless stream-level join; requires a uniform codec family.
    StreamCopy,
    /// Re-encode all clips into one consistent stream.
    Transcode,
}

/// Behavior when the output file already exists.
///
/// The default is `Skip`: an existing output is left untouched and the event
/// is reported as skipped, which makes re-runs over an unchanged tree
/// idempotent. `Force` overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    #[default]
    Skip,
    Force,
}

/// Picks the join mode for a set of normalized clips: stream copy when all
/// clips share one codec family, transcoding join otherwise.
pub fn select_join_mode(clips: &[NormalizedClip]) -> JoinMode {
    let uniform = clips
        .windows(2)
        .all(|pair| pair[0].family == pair[1].family);
    if uniform {
        JoinMode::StreamCopy
    } else {
        JoinMode::Transcode
    }
}

/// Escapes a path for an ffmpeg concat list line (single quotes close,
/// escape, reopen).
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

fn write_concat_list(clips: &[NormalizedClip], work_dir: &Path) -> CoreResult<PathBuf> {
    let list_path = work_dir.join("concat_list.txt");
    let mut file = std::fs::File::create(&list_path)?;
    for clip in clips {
        writeln!(file, "file '{}'", escape_concat_path(&clip.path))?;
    }
    Ok(list_path)
}

/// Joins `clips` into `output_path`.
///
/// The event's title/description and filmed date are embedded as container
/// metadata, sourced from the folder name and the optional sidecar. On any
/// failure the partially written temp file is removed.
pub fn concatenate<S: FfmpegSpawner>(
    spawner: &S,
    event: &EventFolder,
    clips: &[NormalizedClip],
    output_path: &Path,
    mode: JoinMode,
    work_dir: &Path,
) -> CoreResult<()> {
    let list_path = write_concat_list(clips, work_dir)?;

    let file_name = get_filename_safe(output_path)?;
    let parent = output_path.parent().ok_or_else(|| {
        CoreError::PathError(format!(
            "Output path {} has no parent directory",
            output_path.display()
        ))
    })?;
    std::fs::create_dir_all(parent)?;
    let temp_path = parent.join(format!("temp_{file_name}"));

    let sidecar = event.metadata.as_ref();
    let title = sidecar
        .and_then(|m| m.get("title").cloned())
        .unwrap_or_else(|| format!("{} - {}", event.year, event.title));
    let description = sidecar
        .and_then(|m| m.get("description").cloned())
        .unwrap_or_else(|| event.title.clone());

    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.args(["-f", "concat", "-safe", "0"]);
    cmd.input(list_path.to_string_lossy().as_ref());
    match mode {
        JoinMode::StreamCopy => {
            cmd.args(["-c", "copy"]);
        }
        JoinMode::Transcode => {
            cmd.args(["-c:v", "libx264", "-preset", "fast"]);
            cmd.args(["-c:a", "aac"]);
        }
    }
    cmd.arg("-metadata");
    cmd.arg(format!("title={title}"));
    cmd.arg("-metadata");
    cmd.arg(format!("description={description}"));
    cmd.arg("-metadata");
    cmd.arg(format!("creation_time={}T00:00:00", event.date.format("%Y-%m-%d")));
    cmd.output(temp_path.to_string_lossy().as_ref());

    let result = run_ffmpeg(spawner, cmd, "concat")
        .and_then(|()| std::fs::rename(&temp_path, output_path).map_err(CoreError::from));

    if let Err(e) = result {
        if temp_path.exists() {
            if let Err(rm) = std::fs::remove_file(&temp_path) {
                log::warn!("Failed to remove partial output {}: {}", temp_path.display(), rm);
            }
        }
        return Err(CoreError::Concatenation {
            output: output_path.to_path_buf(),
            message: e.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CodecFamily;

    fn clip(family: CodecFamily) -> NormalizedClip {
        NormalizedClip {
            path: PathBuf::from("/tmp/x.mp4"),
            family,
            duration_secs: None,
        }
    }

    #[test]
    fn uniform_families_stream_copy() {
        let clips = vec![clip(CodecFamily::Mp4), clip(CodecFamily::Mp4)];
        assert_eq!(select_join_mode(&clips), JoinMode::StreamCopy);

        let clips = vec![clip(CodecFamily::Matroska); 3];
        assert_eq!(select_join_mode(&clips), JoinMode::StreamCopy);
    }

    #[test]
    fn mixed_families_transcode() {
        let clips = vec![clip(CodecFamily::Mp4), clip(CodecFamily::Matroska)];
        assert_eq!(select_join_mode(&clips), JoinMode::Transcode);
    }

    #[test]
    fn single_clip_stream_copies() {
        let clips = vec![clip(CodecFamily::QuickTime)];
        assert_eq!(select_join_mode(&clips), JoinMode::StreamCopy);
    }

    #[test]
    fn escapes_single_quotes_in_paths() {
        assert_eq!(
            escape_concat_path(Path::new("/videos/it's here.mp4")),
            r"/videos/it'\''s here.mp4"
        );
        assert_eq!(escape_concat_path(Path::new("/plain/path.mp4")), "/plain/path.mp4");
    }

    #[test]
    fn writes_concat_list_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let clips = vec![
            NormalizedClip {
                path: PathBuf::from("/a/video1.mp4"),
                family: CodecFamily::Mp4,
                duration_secs: None,
            },
            NormalizedClip {
                path: PathBuf::from("/a/video2.mp4"),
                family: CodecFamily::Mp4,
                duration_secs: None,
            },
        ];
        let list = write_concat_list(&clips, dir.path()).unwrap();
        let contents = std::fs::read_to_string(list).unwrap();
        assert_eq!(contents, "file '/a/video1.mp4'\nfile '/a/video2.mp4'\n");
    }
}
