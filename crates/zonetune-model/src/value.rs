//! Custom-song attribute values.

use std::path::Path;

/// The literal the game stores when a zone has no custom song.
///
/// This is a real attribute value, not absence: a zone whose attribute is
/// missing entirely has simply never been customized.
pub const NO_CUSTOM_SONG: &str = "|2350|DEFAULT|";

/// Value of a zone's `customSong<N>` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomSongValue {
    /// The "no custom song" sentinel.
    Default,
    /// A filesystem path to the assigned track, forward-slash delimited.
    Path(String),
}

impl CustomSongValue {
    /// Build a value from a raw attribute string.
    pub fn from_attribute_value(raw: &str) -> Self {
        if raw == NO_CUSTOM_SONG {
            Self::Default
        } else {
            Self::Path(raw.to_string())
        }
    }

    /// The string the attribute should carry for this value.
    pub fn as_attribute_value(&self) -> &str {
        match self {
            Self::Default => NO_CUSTOM_SONG,
            Self::Path(path) => path,
        }
    }
}

/// Convert a host path into the form the game accepts.
///
/// The game only reads forward-slash delimited paths, even on Windows.
pub fn to_game_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sentinel_round_trips() {
        let value = CustomSongValue::from_attribute_value(NO_CUSTOM_SONG);
        assert_eq!(value, CustomSongValue::Default);
        assert_eq!(value.as_attribute_value(), NO_CUSTOM_SONG);
    }

    #[test]
    fn path_round_trips() {
        let value = CustomSongValue::from_attribute_value("C:/music/song_lobby.mp3");
        assert_eq!(value.as_attribute_value(), "C:/music/song_lobby.mp3");
    }

    #[test]
    fn game_paths_are_forward_slashed() {
        let path = PathBuf::from(r"C:\music\song_lobby.mp3");
        assert_eq!(to_game_path(&path), "C:/music/song_lobby.mp3");
    }
}
