//! Event folder discovery.
//!
//! Walks the input root exactly two levels deep (root → year → event) and
//! yields [`EventFolder`]s lazily. The depth is fixed by construction: the
//! walk never recurses into an event folder, so nested folders inside an
//! event are never treated as further events.

use crate::classify::{classify_entry, FolderKind};
use crate::error::{CoreError, CoreResult};
use crate::sidecar;

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// One discovered event folder, immutable once yielded.
#[derive(Debug, Clone)]
pub struct EventFolder {
    /// Absolute path of the event folder.
    pub path: PathBuf,
    /// Year folder the event lives under.
    pub year: i32,
    /// Calendar date parsed from the folder name.
    pub date: NaiveDate,
    /// Title parsed from the folder name (unsanitized).
    pub title: String,
    /// Optional opaque key-value sidecar metadata, if present.
    pub metadata: Option<HashMap<String, String>>,
}

impl EventFolder {
    /// Short `year/folder-name` label used in logs and reports.
    pub fn label(&self) -> String {
        format!("{}/{} - {}", self.year, self.date.format("%Y-%m-%d"), self.title)
    }
}

/// Lazy two-level walk over a collection root.
///
/// Year folders excluded by the filter are pruned without being opened;
/// [`EventWalk::years_walked`] counts the year directories actually read,
/// which tests use to verify the pruning.
pub struct EventWalk {
    years: VecDeque<(i32, PathBuf)>,
    pending: VecDeque<EventFolder>,
    years_walked: usize,
}

impl EventWalk {
    /// Number of year directories that have been opened so far.
    pub fn years_walked(&self) -> usize {
        self.years_walked
    }

    fn load_next_year(&mut self) -> bool {
        let Some((year, year_path)) = self.years.pop_front() else {
            return false;
        };
        self.years_walked += 1;

        let entries = match std::fs::read_dir(&year_path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Skipping unreadable year folder {}: {}", year_path.display(), e);
                return true;
            }
        };

        let mut events: Vec<EventFolder> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", year_path.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name();
            match classify_entry(&name.to_string_lossy()) {
                FolderKind::Event { date, title } => {
                    let metadata = sidecar::load_sidecar(&path);
                    events.push(EventFolder {
                        path,
                        year,
                        date,
                        title,
                        metadata,
                    });
                }
                other => {
                    log::debug!(
                        "Ignoring {} under {}: classified as {:?}",
                        name.to_string_lossy(),
                        year_path.display(),
                        other
                    );
                }
            }
        }

        // ISO date prefixes make lexical order chronological.
        events.sort_by(|a, b| a.path.cmp(&b.path));
        self.pending.extend(events);
        true
    }
}

impl Iterator for EventWalk {
    type Item = EventFolder;

    fn next(&mut self) -> Option<EventFolder> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if !self.load_next_year() {
                return None;
            }
        }
    }
}

/// Discovers event folders under `root`, optionally filtered to a set of
/// years. An empty filter means all years.
///
/// The root's immediate children are classified eagerly (so an unreadable
/// root fails fast with [`CoreError::Discovery`]); each retained year folder
/// is read lazily as the returned walk is consumed. A single unreadable year
/// folder is skipped with a warning, not fatal to the whole walk.
pub fn discover(root: &Path, year_filter: &BTreeSet<i32>) -> CoreResult<EventWalk> {
    let entries = std::fs::read_dir(root).map_err(|e| CoreError::Discovery {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut years: Vec<(i32, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::Discovery {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let FolderKind::Year(year) = classify_entry(&entry.file_name().to_string_lossy()) {
            if year_filter.is_empty() || year_filter.contains(&year) {
                years.push((year, path));
            } else {
                log::debug!("Pruning year {} (not in filter)", year);
            }
        }
    }
    years.sort_by_key(|(year, _)| *year);

    Ok(EventWalk {
        years: years.into(),
        pending: VecDeque::new(),
        years_walked: 0,
    })
}
