//! Zone descriptors.

use serde::Deserialize;

/// One assignable custom-music slot in the game save file.
///
/// Descriptors are defined once at startup (builtin table or external JSON)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDescriptor {
    /// Canonical zone name, always the first entry of `aliases`.
    pub id: String,
    /// Accepted names for this zone. Matching is case-insensitive.
    pub aliases: Vec<String>,
    /// Suffix of the zone's `customSong<N>` save attribute. Unique per zone.
    pub slot_index: u32,
}

impl ZoneDescriptor {
    pub fn new(aliases: Vec<String>, slot_index: u32) -> Option<Self> {
        let id = aliases.first()?.clone();
        Some(Self {
            id,
            aliases,
            slot_index,
        })
    }

    /// Name of the zone's save attribute, e.g. `customSong3`.
    pub fn attribute_name(&self) -> String {
        format!("customSong{}", self.slot_index)
    }

    /// Stable file name carrying this zone's audio, e.g. `song_lobby.mp3`.
    pub fn song_file_name(&self) -> String {
        format!("song_{}.mp3", self.id)
    }
}

/// External zone-table entry shape: `{ "names": [...], "gameIndex": N }`.
#[derive(Debug, Deserialize)]
pub struct ZoneTableEntry {
    pub names: Vec<String>,
    #[serde(rename = "gameIndex")]
    pub game_index: u32,
}

/// Top-level shape of an external zone table file.
#[derive(Debug, Deserialize)]
pub struct ZoneTable {
    pub zones: Vec<ZoneTableEntry>,
}
