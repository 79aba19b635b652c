//! Optional sidecar metadata files.
//!
//! An event folder may carry a `metadata.json` next to its clips: a flat
//! string-to-string map the pipeline treats as opaque. Known keys (`title`,
//! `description`) feed the output container metadata; everything else is
//! ignored. The sidecar is advisory, so a malformed file is logged and
//! dropped rather than failing the event.

use std::collections::HashMap;
use std::path::Path;

/// Filename of the optional per-event metadata sidecar.
pub const SIDECAR_FILENAME: &str = "metadata.json";

/// Loads the sidecar map from an event folder, if one exists and parses.
pub fn load_sidecar(event_dir: &Path) -> Option<HashMap<String, String>> {
    let path = event_dir.join(SIDECAR_FILENAME);
    let file = std::fs::File::open(&path).ok()?;
    match serde_json::from_reader(std::io::BufReader::new(file)) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("Ignoring malformed sidecar {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn loads_valid_sidecar() {
        let dir = tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(SIDECAR_FILENAME)).unwrap();
        write!(file, r#"{{"title": "Lake Trip", "description": "Summer"}}"#).unwrap();

        let map = load_sidecar(dir.path()).unwrap();
        assert_eq!(map.get("title").map(String::as_str), Some("Lake Trip"));
        assert_eq!(map.get("description").map(String::as_str), Some("Summer"));
    }

    #[test]
    fn missing_sidecar_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_sidecar(dir.path()).is_none());
    }

    #[test]
    fn malformed_sidecar_is_none() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SIDECAR_FILENAME), b"not json").unwrap();
        assert!(load_sidecar(dir.path()).is_none());
    }
}
