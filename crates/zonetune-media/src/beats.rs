//! Beat-timing sources.
//!
//! A beatmap is a newline-separated list of beat timestamps in seconds.
//! Two sources exist: shelling out to an external detector executable, and
//! synthesizing a uniform-interval sequence from an explicit BPM. Selection
//! happens in configuration, not by branching inside the orchestrator.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{MediaError, Result};

/// BPM values at or above this are rejected as nonsense.
pub const MAX_BPM: f64 = 60_000.0;

/// Capability to produce a beatmap file for an audio file.
pub trait BeatSource {
    fn write_beats(&self, audio_path: &Path, duration_seconds: f64, output_path: &Path)
    -> Result<()>;
}

/// Runs an external detector as `<program> <audio> <output>`.
///
/// On success the program writes the beatmap to `<output>` itself.
pub struct ExecutableDetector {
    program: PathBuf,
}

impl ExecutableDetector {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BeatSource for ExecutableDetector {
    fn write_beats(
        &self,
        audio_path: &Path,
        _duration_seconds: f64,
        output_path: &Path,
    ) -> Result<()> {
        if !self.program.exists() {
            return Err(MediaError::BeatmapSourceMissing {
                searched: self.program.clone(),
            });
        }

        tracing::info!(
            program = %self.program.display(),
            audio = %audio_path.display(),
            output = %output_path.display(),
            "detecting beats"
        );
        let output = Command::new(&self.program)
            .arg(audio_path)
            .arg(output_path)
            .output()
            .map_err(|e| MediaError::DetectorFailed {
                message: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::DetectorFailed {
                message: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            });
        }
        Ok(())
    }
}

/// Synthesizes beats at a fixed interval of `60 / bpm` seconds.
///
/// This is a deterministic arithmetic sequence, not an approximation of real
/// beat detection: `offset + k * 60/bpm` for every `k` whose multiple lies
/// strictly below the track duration.
pub struct FixedBpm {
    bpm: f64,
    offset_seconds: f64,
}

impl FixedBpm {
    pub fn new(bpm: f64, offset_seconds: f64) -> Result<Self> {
        if !bpm.is_finite() || bpm <= 0.0 || bpm >= MAX_BPM {
            return Err(MediaError::InvalidBpm { bpm });
        }
        if !offset_seconds.is_finite() || offset_seconds < 0.0 {
            return Err(MediaError::InvalidOffset {
                offset: offset_seconds,
            });
        }
        Ok(Self {
            bpm,
            offset_seconds,
        })
    }

    /// The synthesized timestamp sequence for a track of the given duration.
    pub fn beats(&self, duration_seconds: f64) -> Vec<f64> {
        let interval = 60.0 / self.bpm;
        let mut beats = Vec::new();
        if !duration_seconds.is_finite() {
            return beats;
        }

        // Multiply instead of accumulating to avoid drift over long tracks.
        let mut k = 0u64;
        loop {
            let multiple = k as f64 * interval;
            if multiple >= duration_seconds {
                break;
            }
            beats.push(self.offset_seconds + multiple);
            k += 1;
        }
        beats
    }
}

impl BeatSource for FixedBpm {
    fn write_beats(
        &self,
        _audio_path: &Path,
        duration_seconds: f64,
        output_path: &Path,
    ) -> Result<()> {
        let beats = self.beats(duration_seconds);
        tracing::info!(
            bpm = self.bpm,
            offset = self.offset_seconds,
            count = beats.len(),
            output = %output_path.display(),
            "synthesizing beatmap"
        );

        let content = beats
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(output_path, content).map_err(|e| MediaError::Io {
            operation: "write beatmap",
            path: output_path.to_path_buf(),
            source: e,
        })
    }
}
