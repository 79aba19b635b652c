//! Clip inventory for one event folder.
//!
//! Lists the media files directly inside an event folder, filters them to
//! the recognized video extensions, and fixes the processing order. The
//! order governs final concatenation order, so it must be deterministic and
//! stable across runs: filenames with a trailing number sort numerically
//! (`video2` before `video10`), everything else falls back to plain lexical
//! order.

use crate::discovery::EventFolder;
use crate::error::{CoreError, CoreResult};
use crate::normalize::{detect_family, needs_reencode, CodecFamily};

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::path::PathBuf;

/// One candidate clip inside an event folder.
#[derive(Debug, Clone)]
pub struct ClipDescriptor {
    /// Source path of the clip.
    pub source: PathBuf,
    /// Container/codec family detected from the extension.
    pub family: CodecFamily,
    /// Position within the event; strictly increasing and gap-free.
    pub index: usize,
    /// Whether normalization must re-encode this clip.
    pub needs_reencode: bool,
}

static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<prefix>.*?)(?P<num>\d+)$").expect("valid regex"));

/// Sort key for natural filename ordering: lowercased stem prefix, trailing
/// number if any, then the full lowercased name as a tiebreak.
fn natural_key(file_name: &str) -> (String, Option<u64>, String) {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    match TRAILING_NUMBER.captures(stem) {
        Some(caps) => (
            caps["prefix"].to_lowercase(),
            Some(caps["num"].parse().unwrap_or(u64::MAX)),
            file_name.to_lowercase(),
        ),
        None => (stem.to_lowercase(), None, file_name.to_lowercase()),
    }
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b)).then_with(|| a.cmp(b))
}

/// Lists the eligible clips of an event folder in processing order.
///
/// Fails with [`CoreError::EmptyEvent`] if no eligible clips are found; the
/// orchestrator treats that as a skipped event, not a fatal error.
pub fn list_clips(event: &EventFolder) -> CoreResult<Vec<ClipDescriptor>> {
    let entries = std::fs::read_dir(&event.path)?;

    let mut files: Vec<(String, PathBuf, CodecFamily)> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            let family = detect_family(&path)?;
            Some((entry.file_name().to_string_lossy().into_owned(), path, family))
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::EmptyEvent(event.path.clone()));
    }

    files.sort_by(|(a, _, _), (b, _, _)| natural_cmp(a, b));

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(index, (_, source, family))| ClipDescriptor {
            source,
            family,
            index,
            needs_reencode: needs_reencode(family),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_trailing_numbers_numerically() {
        assert_eq!(natural_cmp("video2.mp4", "video10.mp4"), Ordering::Less);
        assert_eq!(natural_cmp("video10.mp4", "video2.mp4"), Ordering::Greater);
        assert_eq!(natural_cmp("video2.mp4", "video2.mp4"), Ordering::Equal);
    }

    #[test]
    fn falls_back_to_lexical_order() {
        assert_eq!(natural_cmp("beach.mp4", "zoo.mp4"), Ordering::Less);
        assert_eq!(natural_cmp("Beach.mp4", "zoo.mp4"), Ordering::Less);
    }

    #[test]
    fn mixed_prefixes_group_before_numbering() {
        assert_eq!(natural_cmp("a9.mp4", "b1.mp4"), Ordering::Less);
        assert_eq!(natural_cmp("clip1.mp4", "video1.mp4"), Ordering::Less);
    }
}
