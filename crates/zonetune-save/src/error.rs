use std::path::PathBuf;

use thiserror::Error;

/// Save-file operation errors.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save file does not exist.
    #[error("save file not found: {path}")]
    NotFound { path: PathBuf },

    /// An edit or persist was attempted before `load()`.
    #[error("save file content not loaded")]
    NotLoaded,

    /// The document could not be parsed as XML.
    #[error("malformed save document")]
    Parse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document parsed but contains no `game` element.
    #[error("save document has no <game> element")]
    MissingGameElement,

    /// The zone identifier is not present in the registry.
    #[error("unknown zone identifier: \"{identifier}\"")]
    UnknownZone { identifier: String },

    /// A backup target already exists; refuse to overwrite it.
    #[error("backup already exists: {path}")]
    BackupExists { path: PathBuf },

    /// File I/O error.
    #[error("failed to {operation} save file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not be renamed over the save file.
    #[error("failed to complete save-file write")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized back to XML.
    #[error("failed to serialize save document")]
    Serialize {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, SaveError>;
