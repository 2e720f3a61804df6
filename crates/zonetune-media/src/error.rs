use std::path::PathBuf;

use thiserror::Error;

/// Media pipeline errors.
///
/// Collaborator failures are surfaced as-is, never retried; retry policy
/// belongs to the collaborators themselves.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The download collaborator failed (network, extraction, bad link).
    #[error("media fetch failed: {message}")]
    FetchFailed { message: String },

    /// Neither a beat-detection executable nor an explicit BPM is available.
    #[error("no beatmap source: no beat tracker at {searched} and no BPM provided")]
    BeatmapSourceMissing { searched: PathBuf },

    /// The beat-detection executable exited with a failure.
    #[error("beat detector failed: {message}")]
    DetectorFailed { message: String },

    /// A BPM outside the accepted range (0, 60000) was supplied.
    #[error("invalid BPM {bpm}: must be a finite number between 0 and 60000 exclusive")]
    InvalidBpm { bpm: f64 },

    /// A negative or non-finite beat offset was supplied.
    #[error("invalid beat offset {offset}: must be a finite non-negative number")]
    InvalidOffset { offset: f64 },

    /// File I/O error.
    #[error("failed to {operation}: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MediaError>;
