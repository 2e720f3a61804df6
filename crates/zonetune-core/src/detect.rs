//! Save-file auto-detection.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Find a save file under `<game_dir>/data`.
///
/// Save files are named `save_data<N>.xml`. When several exist, the lowest
/// numbered one wins so that detection stays deterministic.
pub fn detect_save_file(game_dir: &Path) -> Result<Option<PathBuf>> {
    let data_dir = game_dir.join("data");
    let entries = std::fs::read_dir(&data_dir).map_err(|e| CoreError::Io {
        operation: "read data directory",
        path: data_dir.clone(),
        source: e,
    })?;

    let mut candidates: Vec<(u64, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::Io {
            operation: "read data directory",
            path: data_dir.clone(),
            source: e,
        })?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(number) = save_file_number(name) {
            candidates.push((number, entry.path()));
        }
    }

    candidates.sort_by_key(|(number, _)| *number);
    let detected = candidates.into_iter().next().map(|(_, path)| path);
    if let Some(path) = &detected {
        tracing::debug!(path = %path.display(), "auto-detected save file");
    }
    Ok(detected)
}

/// Parse the numeric suffix of a `save_data<N>.xml` file name.
fn save_file_number(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("save_data")?.strip_suffix(".xml")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn matches_only_save_data_files() {
        assert_eq!(save_file_number("save_data0.xml"), Some(0));
        assert_eq!(save_file_number("save_data12.xml"), Some(12));
        assert_eq!(save_file_number("save_data.xml"), None);
        assert_eq!(save_file_number("save_dataX.xml"), None);
        assert_eq!(save_file_number("save_data0.xml.bak"), None);
        assert_eq!(save_file_number("other.xml"), None);
    }

    #[test]
    fn lowest_numbered_save_wins() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        std::fs::write(data.join("save_data3.xml"), "x").unwrap();
        std::fs::write(data.join("save_data1.xml"), "x").unwrap();
        std::fs::write(data.join("settings.xml"), "x").unwrap();

        let detected = detect_save_file(dir.path()).unwrap().unwrap();
        assert_eq!(detected.file_name().unwrap(), "save_data1.xml");
    }

    #[test]
    fn empty_data_dir_detects_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        assert!(detect_save_file(dir.path()).unwrap().is_none());
    }

    #[test]
    fn missing_data_dir_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            detect_save_file(dir.path()),
            Err(CoreError::Io { .. })
        ));
    }
}
