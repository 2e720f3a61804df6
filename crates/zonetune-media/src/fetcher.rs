//! The media-download capability and its yt-dlp implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{MediaError, Result};

/// Metadata for a media link, keyed by the collaborator's stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub id: String,
    pub duration_seconds: f64,
}

/// Capability to resolve and download media for a link.
pub trait MediaFetcher {
    /// Resolve the link's stable id and duration without downloading.
    fn probe(&self, link: &str) -> Result<MediaInfo>;

    /// Download the link's audio as mp3. `output_stem` is the destination
    /// path without the `.mp3` extension; the file must land at
    /// `<output_stem>.mp3`.
    fn fetch(&self, link: &str, output_stem: &Path) -> Result<()>;
}

impl<T: MediaFetcher + ?Sized> MediaFetcher for &T {
    fn probe(&self, link: &str) -> Result<MediaInfo> {
        (**self).probe(link)
    }

    fn fetch(&self, link: &str, output_stem: &Path) -> Result<()> {
        (**self).fetch(link, output_stem)
    }
}

/// Shells out to a yt-dlp compatible downloader.
pub struct YtDlpFetcher {
    program: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    id: String,
    duration: f64,
}

impl MediaFetcher for YtDlpFetcher {
    fn probe(&self, link: &str) -> Result<MediaInfo> {
        tracing::debug!(link, program = %self.program.display(), "probing media link");
        let output = Command::new(&self.program)
            .args(["--dump-json", "--no-playlist"])
            .arg(link)
            .output()
            .map_err(|e| MediaError::FetchFailed {
                message: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            return Err(MediaError::FetchFailed {
                message: collaborator_failure(&self.program, &output.stderr, output.status.code()),
            });
        }

        let probe: ProbeOutput =
            serde_json::from_slice(&output.stdout).map_err(|e| MediaError::FetchFailed {
                message: format!("unparsable probe output: {e}"),
            })?;
        Ok(MediaInfo {
            id: probe.id,
            duration_seconds: probe.duration,
        })
    }

    fn fetch(&self, link: &str, output_stem: &Path) -> Result<()> {
        tracing::info!(link, output = %output_stem.display(), "downloading audio");
        let output = Command::new(&self.program)
            .args([
                "--extract-audio",
                "--format",
                "bestaudio",
                "--restrict-filenames",
                "--audio-format",
                "mp3",
                "--output",
            ])
            .arg(format!("{}.%(ext)s", output_stem.display()))
            .arg(link)
            .output()
            .map_err(|e| MediaError::FetchFailed {
                message: format!("failed to run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            return Err(MediaError::FetchFailed {
                message: collaborator_failure(&self.program, &output.stderr, output.status.code()),
            });
        }
        Ok(())
    }
}

fn collaborator_failure(program: &Path, stderr: &[u8], code: Option<i32>) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let detail = stderr.lines().last().unwrap_or("no error output").trim();
    match code {
        Some(code) => format!("{} exited with status {code}: {detail}", program.display()),
        None => format!("{} was terminated by a signal: {detail}", program.display()),
    }
}
