// movie-merge-core/tests/discovery_tests.rs

use movie_merge_core::discovery::discover;
use movie_merge_core::error::CoreError;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn make_event(root: &Path, year: &str, name: &str, clips: &[&str]) {
    let dir = root.join(year).join(name);
    fs::create_dir_all(&dir).unwrap();
    for clip in clips {
        File::create(dir.join(clip)).unwrap();
    }
}

#[test]
fn test_discover_all_years() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    make_event(root, "2017", "2017-03-01 - Ski Trip", &["video1.mp4"]);
    make_event(root, "2018", "2018-07-04 - Lake Trip", &["video1.mp4"]);
    make_event(root, "2018", "2018-08-02 - Zoo", &["video1.mp4"]);
    make_event(root, "2019", "2019-01-01 - New Year", &["video1.mp4"]);

    // Noise that must be ignored
    fs::create_dir_all(root.join("Processed_MTS"))?;
    fs::create_dir_all(root.join("123"))?;
    fs::create_dir_all(root.join("20181"))?;
    fs::create_dir_all(root.join("2018").join("not an event"))?;
    File::create(root.join("stray.txt"))?;

    let mut walk = discover(root, &BTreeSet::new())?;
    let events: Vec<_> = walk.by_ref().collect();

    assert_eq!(events.len(), 4);
    assert_eq!(walk.years_walked(), 3);

    // Years ascending, events within a year in chronological order
    let labels: Vec<String> = events.iter().map(|e| e.label()).collect();
    assert_eq!(
        labels,
        vec![
            "2017/2017-03-01 - Ski Trip",
            "2018/2018-07-04 - Lake Trip",
            "2018/2018-08-02 - Zoo",
            "2019/2019-01-01 - New Year",
        ]
    );
    assert_eq!(events[1].year, 2018);
    assert_eq!(events[1].title, "Lake Trip");

    Ok(())
}

#[test]
fn test_year_filter_prunes_subtrees() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    make_event(root, "2017", "2017-03-01 - Ski Trip", &["video1.mp4"]);
    make_event(root, "2018", "2018-07-04 - Lake Trip", &["video1.mp4"]);
    make_event(root, "2019", "2019-01-01 - New Year", &["video1.mp4"]);

    let mut walk = discover(root, &BTreeSet::from([2018]))?;
    let events: Vec<_> = walk.by_ref().collect();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].year, 2018);
    // Excluded year folders are pruned without being opened.
    assert_eq!(walk.years_walked(), 1);

    Ok(())
}

#[test]
fn test_walk_depth_is_fixed_at_two_levels() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    make_event(root, "2018", "2018-07-04 - Lake Trip", &["video1.mp4"]);
    // A nested folder that looks like an event must not become one.
    let nested = root
        .join("2018")
        .join("2018-07-04 - Lake Trip")
        .join("2018-07-05 - Inner");
    fs::create_dir_all(&nested)?;
    File::create(nested.join("video1.mp4"))?;

    // An event-shaped folder directly at the root is not under a year.
    let stray = root.join("2018-07-06 - Stray");
    fs::create_dir_all(&stray)?;
    File::create(stray.join("video1.mp4"))?;

    let events: Vec<_> = discover(root, &BTreeSet::new())?.collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Lake Trip");

    Ok(())
}

#[test]
fn test_sidecar_metadata_is_attached() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    make_event(root, "2018", "2018-07-04 - Lake Trip", &["video1.mp4"]);
    fs::write(
        root.join("2018")
            .join("2018-07-04 - Lake Trip")
            .join("metadata.json"),
        br#"{"title": "The Big Lake Trip"}"#,
    )?;
    make_event(root, "2018", "2018-08-02 - Zoo", &["video1.mp4"]);

    let events: Vec<_> = discover(root, &BTreeSet::new())?.collect();
    assert_eq!(events.len(), 2);

    let lake = events.iter().find(|e| e.title == "Lake Trip").unwrap();
    let zoo = events.iter().find(|e| e.title == "Zoo").unwrap();
    assert_eq!(
        lake.metadata.as_ref().and_then(|m| m.get("title")).map(String::as_str),
        Some("The Big Lake Trip")
    );
    assert!(zoo.metadata.is_none());

    Ok(())
}

#[test]
fn test_discover_nonexistent_root() {
    let non_existent = PathBuf::from("surely_this_does_not_exist_42_integration");
    let result = discover(&non_existent, &BTreeSet::new());
    assert!(result.is_err());
    match result.err().unwrap() {
        CoreError::Discovery { .. } => {}
        e => panic!("Unexpected error type: {e:?}"),
    }
}
