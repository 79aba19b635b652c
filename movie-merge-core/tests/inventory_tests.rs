// movie-merge-core/tests/inventory_tests.rs

use movie_merge_core::discovery::{discover, EventFolder};
use movie_merge_core::error::CoreError;
use movie_merge_core::inventory::list_clips;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

fn single_event(root: &Path, clips: &[&str]) -> EventFolder {
    let dir = root.join("2018").join("2018-07-04 - Lake Trip");
    fs::create_dir_all(&dir).unwrap();
    for clip in clips {
        File::create(dir.join(clip)).unwrap();
    }
    discover(root, &BTreeSet::new())
        .unwrap()
        .next()
        .expect("one event")
}

#[test]
fn test_numeric_ordering_beats_lexical() {
    let dir = tempdir().unwrap();
    let event = single_event(dir.path(), &["video10.mp4", "video1.mp4", "video2.mp4"]);

    let clips = list_clips(&event).unwrap();
    let names: Vec<String> = clips
        .iter()
        .map(|c| c.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["video1.mp4", "video2.mp4", "video10.mp4"]);

    // Indices are gap-free and increasing.
    let indices: Vec<usize> = clips.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_ordering_is_stable_across_runs() {
    let dir = tempdir().unwrap();
    let event = single_event(
        dir.path(),
        &["b.mov", "a.mkv", "clip2.mp4", "clip10.mp4", "Clip1.MTS"],
    );

    let first: Vec<_> = list_clips(&event)
        .unwrap()
        .into_iter()
        .map(|c| c.source)
        .collect();
    for _ in 0..5 {
        let again: Vec<_> = list_clips(&event)
            .unwrap()
            .into_iter()
            .map(|c| c.source)
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_filters_to_video_extensions_and_flags_legacy() {
    let dir = tempdir().unwrap();
    let event = single_event(
        dir.path(),
        &["video1.mp4", "Clip.MTS", "notes.txt", "cover.jpg", "metadata.json"],
    );
    // Subdirectories inside the event are not clips.
    fs::create_dir_all(event.path.join("Processed_MTS")).unwrap();

    let clips = list_clips(&event).unwrap();
    assert_eq!(clips.len(), 2);

    let legacy = clips
        .iter()
        .find(|c| c.source.extension().unwrap().eq_ignore_ascii_case("mts"))
        .unwrap();
    assert!(legacy.needs_reencode);

    let standard = clips
        .iter()
        .find(|c| c.source.extension().unwrap().eq_ignore_ascii_case("mp4"))
        .unwrap();
    assert!(!standard.needs_reencode);
}

#[test]
fn test_empty_event_errors() {
    let dir = tempdir().unwrap();
    let event = single_event(dir.path(), &["notes.txt", "cover.jpg"]);

    match list_clips(&event) {
        Err(CoreError::EmptyEvent(path)) => assert_eq!(path, event.path),
        other => panic!("Expected EmptyEvent, got {other:?}"),
    }
}
