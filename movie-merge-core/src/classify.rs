//! Directory entry classification.
//!
//! Folder names decide everything about the input tree: a four-digit name is
//! a year folder, a `<YYYY-MM-DD> - <title>` name is an event folder, and
//! anything else is ignored. Classification is a pure function over the name;
//! no filesystem access happens here.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between the date and the title in an event folder name.
const EVENT_SEPARATOR: &str = " - ";

/// The classification of a single directory entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderKind {
    /// A four-digit year folder (e.g. `2018`).
    Year(i32),
    /// An event folder: `<YYYY-MM-DD> - <title>`.
    Event { date: NaiveDate, title: String },
    /// Anything else, including files.
    Ignored,
}

/// Classifies one directory entry name.
///
/// A name that is all digits but not exactly four long is `Ignored`, not a
/// year; this narrowing keeps unrelated numeric folders out of the walk.
/// Titles may themselves contain the ` - ` separator; everything after the
/// first separator is the title.
pub fn classify_entry(name: &str) -> FolderKind {
    if name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit()) {
        // Unwrap is fine: four ASCII digits always parse.
        return FolderKind::Year(name.parse().unwrap());
    }

    if let Some((date_part, title_part)) = name.split_once(EVENT_SEPARATOR) {
        if let Ok(date) = NaiveDate::parse_from_str(date_part.trim(), "%Y-%m-%d") {
            let title = title_part.trim();
            if !title.is_empty() {
                return FolderKind::Event {
                    date,
                    title: title.to_string(),
                };
            }
        }
    }

    FolderKind::Ignored
}

static RESERVED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\?%*:|"<>.]"#).expect("valid regex"));
static RESERVED_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(con|prn|aux|nul|com[0-9]|lpt[0-9])\b").expect("valid regex"));

/// Sanitizes an event title for use as an output filename.
///
/// Replaces filesystem-reserved characters and Windows-reserved device words
/// with underscores, then strips leading/trailing dots and spaces.
pub fn sanitize_title(title: &str) -> String {
    let title = RESERVED_WORDS.replace_all(title, "_");
    let title = RESERVED_CHARS.replace_all(&title, "_");
    title.trim_matches(|c| c == '.' || c == ' ').to_string()
}
