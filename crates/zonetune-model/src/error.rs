use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a zone registry.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Two zones claim the same slot index.
    #[error("zones \"{first}\" and \"{second}\" share slot index {slot}")]
    DuplicateSlot {
        slot: u32,
        first: String,
        second: String,
    },

    /// A zone table entry has no names at all.
    #[error("zone table entry {index} has an empty name list")]
    EmptyNames { index: usize },

    /// The zone table file could not be read.
    #[error("failed to read zone table: {path}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zone table file is not valid JSON of the expected shape.
    #[error("failed to parse zone table: {path}")]
    TableParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
