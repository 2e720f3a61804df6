//! Zone registry and custom-song value model.
//!
//! Zones are the named slots of the game save file that can carry a custom
//! music track. Each zone owns a unique slot index, which is the numeric
//! suffix of its `customSong<N>` attribute in the save document.

pub mod error;
pub mod registry;
pub mod value;
pub mod zone;

pub use error::{ModelError, Result};
pub use registry::ZoneRegistry;
pub use value::{CustomSongValue, NO_CUSTOM_SONG, to_game_path};
pub use zone::ZoneDescriptor;
