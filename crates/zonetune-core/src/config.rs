//! Tool configuration.
//!
//! A single JSON file holds the game location plus optional overrides for
//! every externally-configured path. Unset paths fall back to a `zonetune`
//! directory under the game's `data` folder, keeping all tool artifacts next
//! to the save data they serve.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Game installation directory. Required for every operation.
    pub game_dir: Option<PathBuf>,
    /// Save file name under `<gameDir>/data`, or an absolute path.
    /// Auto-detected and written back when unset.
    pub save_file: Option<String>,
    /// Cache directory for downloaded audio.
    pub music_dir: Option<PathBuf>,
    /// Directory holding the stable audio links.
    pub links_dir: Option<PathBuf>,
    /// Directory for generated beatmap files.
    pub beatmap_dir: Option<PathBuf>,
    /// Beat-detection executable. Defaults to the game's bundled tracker.
    pub beat_tracker: Option<PathBuf>,
    /// External zone table (JSON). Builtin table when unset.
    pub zone_table: Option<PathBuf>,
    /// yt-dlp compatible downloader program.
    pub downloader: Option<PathBuf>,
    /// Write the save file even when nothing changed.
    pub always_persist: bool,
}

impl Config {
    /// Load a config file, failing when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load a config file, treating a missing file as the default config.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| CoreError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(CoreError::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Write the config back as pretty JSON.
    pub fn store(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| CoreError::ConfigWrite {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(path, content).map_err(|e| CoreError::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn tool_dir(&self, game_dir: &Path) -> PathBuf {
        game_dir.join("data").join("zonetune")
    }

    pub fn resolved_music_dir(&self, game_dir: &Path) -> PathBuf {
        self.music_dir
            .clone()
            .unwrap_or_else(|| self.tool_dir(game_dir).join("music"))
    }

    pub fn resolved_links_dir(&self, game_dir: &Path) -> PathBuf {
        self.links_dir
            .clone()
            .unwrap_or_else(|| self.tool_dir(game_dir).join("links"))
    }

    pub fn resolved_beatmap_dir(&self, game_dir: &Path) -> PathBuf {
        self.beatmap_dir
            .clone()
            .unwrap_or_else(|| self.tool_dir(game_dir).join("beatmaps"))
    }

    pub fn resolved_beat_tracker(&self, game_dir: &Path) -> PathBuf {
        self.beat_tracker.clone().unwrap_or_else(|| {
            game_dir
                .join("data")
                .join("essentia")
                .join("beattracker.exe")
        })
    }

    /// Resolve the configured save file against the game's data directory.
    pub fn resolved_save_file(&self, game_dir: &Path) -> Option<PathBuf> {
        let name = self.save_file.as_ref()?;
        let path = PathBuf::from(name);
        if path.is_absolute() {
            Some(path)
        } else {
            Some(game_dir.join("data").join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("zonetune.json")).unwrap();
        assert!(config.game_dir.is_none());
        assert!(!config.always_persist);
    }

    #[test]
    fn explicit_load_of_missing_file_fails() {
        let result = Config::load(Path::new("/nonexistent/zonetune.json"));
        assert!(matches!(result, Err(CoreError::ConfigRead { .. })));
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zonetune.json");
        let config = Config {
            game_dir: Some(PathBuf::from("/games/dungeon")),
            save_file: Some("save_data0.xml".to_string()),
            ..Config::default()
        };
        config.store(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.game_dir, config.game_dir);
        assert_eq!(loaded.save_file, config.save_file);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let config: Config = serde_json::from_str(
            r#"{"gameDir": "/games/dungeon", "saveFile": "save_data0.xml", "alwaysPersist": true}"#,
        )
        .unwrap();
        assert_eq!(config.game_dir, Some(PathBuf::from("/games/dungeon")));
        assert!(config.always_persist);
    }

    #[test]
    fn default_paths_live_under_the_game_data_dir() {
        let config = Config::default();
        let game_dir = Path::new("/games/dungeon");
        assert_eq!(
            config.resolved_music_dir(game_dir),
            Path::new("/games/dungeon/data/zonetune/music")
        );
        assert_eq!(
            config.resolved_beat_tracker(game_dir),
            Path::new("/games/dungeon/data/essentia/beattracker.exe")
        );
    }

    #[test]
    fn relative_save_file_resolves_under_data() {
        let config = Config {
            save_file: Some("save_data2.xml".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.resolved_save_file(Path::new("/games/dungeon")),
            Some(PathBuf::from("/games/dungeon/data/save_data2.xml"))
        );
    }
}
