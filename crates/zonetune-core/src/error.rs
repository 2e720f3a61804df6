use std::path::PathBuf;

use thiserror::Error;

use zonetune_media::MediaError;
use zonetune_model::ModelError;
use zonetune_save::SaveError;

/// Orchestration errors. Every leaf failure keeps its own kind; nothing is
/// caught or retried here.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The zone identifier is not present in the registry.
    #[error("unknown zone identifier: \"{identifier}\"")]
    UnknownZone { identifier: String },

    /// No game directory is configured.
    #[error("no game directory configured")]
    GameDirMissing,

    /// The configured game directory does not exist or is not a directory.
    #[error("game directory is not a directory: {path}")]
    GameDirInvalid { path: PathBuf },

    /// No save file was configured and none could be auto-detected.
    #[error("no save file configured and none detected under {data_dir}")]
    SaveFileUnresolved { data_dir: PathBuf },

    /// A stable link was pointed at a target that does not exist.
    #[error("link target does not exist: {path}")]
    InvalidTarget { path: PathBuf },

    /// The config file could not be read.
    #[error("failed to read config: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON.
    #[error("failed to parse config: {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file could not be written.
    #[error("failed to write config: {path}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File I/O error.
    #[error("failed to {operation}: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
