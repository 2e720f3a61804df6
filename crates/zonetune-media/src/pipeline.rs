//! The fetch-then-beatmap pipeline.

use std::path::{Path, PathBuf};

use crate::beats::BeatSource;
use crate::error::{MediaError, Result};
use crate::fetcher::MediaFetcher;

/// Options for one `acquire` run.
pub struct AcquireOptions<'a> {
    pub beat_source: &'a dyn BeatSource,
    /// Re-download even when the cached audio file exists.
    pub force_fetch: bool,
    /// Re-generate even when the beatmap file exists.
    pub force_beatmap: bool,
}

/// Resolved artifact locations for one link. Not persisted anywhere.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub media_id: String,
    pub duration_seconds: f64,
    pub media_path: PathBuf,
    pub beatmap_path: PathBuf,
    /// True when the cached audio was reused instead of downloaded.
    pub media_skipped: bool,
    /// True when the existing beatmap was reused instead of generated.
    pub beatmap_skipped: bool,
}

/// Sequences fetch and beatmap generation with per-step idempotence.
///
/// Artifacts are cached at paths keyed by the collaborator's media id, so a
/// second run for the same link reuses both files unless forced.
pub struct MediaPipeline<F: MediaFetcher> {
    fetcher: F,
    music_dir: PathBuf,
    beatmap_dir: PathBuf,
}

impl<F: MediaFetcher> MediaPipeline<F> {
    pub fn new(fetcher: F, music_dir: impl Into<PathBuf>, beatmap_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            music_dir: music_dir.into(),
            beatmap_dir: beatmap_dir.into(),
        }
    }

    pub fn acquire(&self, link: &str, options: &AcquireOptions<'_>) -> Result<PipelineResult> {
        let info = self.fetcher.probe(link)?;
        tracing::debug!(
            id = %info.id,
            duration = info.duration_seconds,
            "media link resolved"
        );

        ensure_dir(&self.music_dir)?;
        ensure_dir(&self.beatmap_dir)?;

        let media_path = self.music_dir.join(format!("{}.mp3", info.id));
        let media_skipped = media_path.exists() && !options.force_fetch;
        if media_skipped {
            tracing::debug!(path = %media_path.display(), "audio already cached");
        } else {
            let output_stem = self.music_dir.join(&info.id);
            self.fetcher.fetch(link, &output_stem)?;
        }

        let beatmap_path = self.beatmap_dir.join(format!("{}.mp3.txt", info.id));
        let beatmap_skipped = beatmap_path.exists() && !options.force_beatmap;
        if beatmap_skipped {
            tracing::debug!(path = %beatmap_path.display(), "beatmap already present");
        } else {
            options
                .beat_source
                .write_beats(&media_path, info.duration_seconds, &beatmap_path)?;
        }

        Ok(PipelineResult {
            media_id: info.id,
            duration_seconds: info.duration_seconds,
            media_path,
            beatmap_path,
            media_skipped,
            beatmap_skipped,
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| MediaError::Io {
        operation: "create directory",
        path: dir.to_path_buf(),
        source: e,
    })
}
