//! The top-level sync transaction.
//!
//! `full_process` sequences fetch, beatmap, link indirection, and the
//! save-file edit in strict order. The save document is handled as one
//! load/mutate/persist transaction: any failure before `persist` leaves the
//! file on disk untouched. Media files and links created before such a
//! failure are idempotently reusable on the next run.

use std::path::{Path, PathBuf};

use zonetune_media::{
    AcquireOptions, BeatSource, ExecutableDetector, FixedBpm, MediaFetcher, MediaPipeline,
};
use zonetune_model::{ZoneDescriptor, ZoneRegistry};
use zonetune_save::SaveFileEditor;

use crate::config::Config;
use crate::detect::detect_save_file;
use crate::error::{CoreError, Result};
use crate::links::{LinkKind, LinkLayer};

/// Options for one `full_process` run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Media locator, anything the downloader collaborator accepts.
    pub link: String,
    /// Target zone identifier (any alias).
    pub zone: String,
    /// Explicit BPM; when set, beats are synthesized instead of detected.
    pub bpm: Option<f64>,
    /// Forward shift of the synthesized beats, in seconds.
    pub offset_seconds: Option<f64>,
    /// Beat-detection executable override.
    pub beat_tracker: Option<PathBuf>,
    /// Re-download and re-beatmap even when cached artifacts exist.
    pub force: bool,
    /// Back up the save file before persisting.
    pub backup: bool,
    /// Rewrite every zone's attribute to its stable link path, not just the
    /// target zone's. On by default so later runs never touch the save again.
    pub prepare_all_zones: bool,
    /// Explicit save file path, bypassing config and detection.
    pub save_file: Option<PathBuf>,
}

impl ProcessOptions {
    pub fn new(link: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            zone: zone.into(),
            bpm: None,
            offset_seconds: None,
            beat_tracker: None,
            force: false,
            backup: false,
            prepare_all_zones: true,
            save_file: None,
        }
    }
}

/// What one `full_process` run did.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub media_path: PathBuf,
    pub beatmap_path: PathBuf,
    pub media_skipped: bool,
    pub beatmap_skipped: bool,
    pub save_path: PathBuf,
    /// True when the save file was found by auto-detection.
    pub save_detected: bool,
    /// True when the save file was actually rewritten.
    pub save_written: bool,
    pub backup_path: Option<PathBuf>,
}

/// What a `reset_zones` run did.
#[derive(Debug, Clone)]
pub struct ResetOutcome {
    pub zones_reset: usize,
    pub save_path: PathBuf,
}

pub struct Orchestrator<F: MediaFetcher> {
    registry: ZoneRegistry,
    config: Config,
    fetcher: F,
    game_dir: PathBuf,
    links: LinkLayer,
}

impl<F: MediaFetcher> Orchestrator<F> {
    pub fn new(registry: ZoneRegistry, config: Config, fetcher: F) -> Result<Self> {
        let game_dir = config.game_dir.clone().ok_or(CoreError::GameDirMissing)?;
        if !game_dir.is_dir() {
            return Err(CoreError::GameDirInvalid { path: game_dir });
        }

        let links = LinkLayer::new(
            config.resolved_links_dir(&game_dir),
            game_dir.join("data").join("custom_music"),
        );
        Ok(Self {
            registry,
            config,
            fetcher,
            game_dir,
            links,
        })
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    /// Download, beatmap, link, and write one zone's custom song.
    pub fn full_process(&self, options: &ProcessOptions) -> Result<ProcessOutcome> {
        // Resolve the zone before any I/O happens.
        let zone = self
            .registry
            .resolve(&options.zone)
            .ok_or_else(|| CoreError::UnknownZone {
                identifier: options.zone.clone(),
            })?
            .clone();
        let beat_source = self.beat_source(options)?;

        let pipeline = MediaPipeline::new(
            &self.fetcher,
            self.config.resolved_music_dir(&self.game_dir),
            self.config.resolved_beatmap_dir(&self.game_dir),
        );
        let result = pipeline.acquire(
            &options.link,
            &AcquireOptions {
                beat_source: beat_source.as_ref(),
                force_fetch: options.force,
                force_beatmap: options.force,
            },
        )?;

        self.links.point(&zone, LinkKind::Audio, &result.media_path)?;
        self.links
            .point(&zone, LinkKind::Beatmap, &result.beatmap_path)?;

        let (save_path, save_detected) = self.resolve_save_path(options.save_file.as_deref())?;
        let mut editor = SaveFileEditor::new(&save_path, &self.registry);
        editor.load()?;

        let backup_path = if options.backup {
            Some(editor.backup()?)
        } else {
            None
        };

        if options.prepare_all_zones {
            self.prepare_zone_attributes(&mut editor)?;
        } else {
            let link = self.links.stable_path(&zone, LinkKind::Audio);
            editor.set_custom_song(&zone.id, Some(&link))?;
        }

        let save_written = editor.is_dirty() || self.config.always_persist;
        if save_written {
            editor.persist()?;
        } else {
            tracing::debug!(path = %save_path.display(), "save file unchanged, skipping write");
        }

        Ok(ProcessOutcome {
            media_path: result.media_path,
            beatmap_path: result.beatmap_path,
            media_skipped: result.media_skipped,
            beatmap_skipped: result.beatmap_skipped,
            save_path,
            save_detected,
            save_written,
            backup_path,
        })
    }

    /// Set one or more zones back to the "no custom song" sentinel.
    ///
    /// `["all"]` expands to the whole registry. An unknown identifier in an
    /// explicit list fails before anything is edited. All zones are cleared
    /// in one transaction with exactly one document write.
    pub fn reset_zones(
        &self,
        save_file: Option<&Path>,
        zones: &[String],
    ) -> Result<ResetOutcome> {
        let zones = self.resolve_zone_list(zones)?;

        let (save_path, _) = self.resolve_save_path(save_file)?;
        let mut editor = SaveFileEditor::new(&save_path, &self.registry);
        editor.load()?;
        for zone in &zones {
            editor.set_custom_song(&zone.id, None)?;
        }
        editor.persist()?;

        tracing::info!(count = zones.len(), path = %save_path.display(), "zones reset");
        Ok(ResetOutcome {
            zones_reset: zones.len(),
            save_path,
        })
    }

    /// Rewrite every zone's attribute to its stable audio-link path inside an
    /// already-open editor transaction.
    pub fn prepare_zone_attributes(&self, editor: &mut SaveFileEditor<'_>) -> Result<()> {
        for zone in self.registry.all() {
            let link = self.links.stable_path(zone, LinkKind::Audio);
            editor.set_custom_song(&zone.id, Some(&link))?;
        }
        Ok(())
    }

    fn beat_source(&self, options: &ProcessOptions) -> Result<Box<dyn BeatSource>> {
        match options.bpm {
            Some(bpm) => {
                let offset = options.offset_seconds.unwrap_or(0.0);
                Ok(Box::new(FixedBpm::new(bpm, offset)?))
            }
            None => {
                let program = options
                    .beat_tracker
                    .clone()
                    .unwrap_or_else(|| self.config.resolved_beat_tracker(&self.game_dir));
                Ok(Box::new(ExecutableDetector::new(program)))
            }
        }
    }

    fn resolve_save_path(&self, explicit: Option<&Path>) -> Result<(PathBuf, bool)> {
        if let Some(path) = explicit {
            return Ok((path.to_path_buf(), false));
        }
        if let Some(path) = self.config.resolved_save_file(&self.game_dir) {
            return Ok((path, false));
        }
        match detect_save_file(&self.game_dir)? {
            Some(path) => Ok((path, true)),
            None => Err(CoreError::SaveFileUnresolved {
                data_dir: self.game_dir.join("data"),
            }),
        }
    }

    /// Expand `["all"]` or resolve each identifier, failing fast on unknowns.
    fn resolve_zone_list(&self, zones: &[String]) -> Result<Vec<ZoneDescriptor>> {
        if zones.len() == 1 && zones[0].eq_ignore_ascii_case("all") {
            return Ok(self.registry.all().to_vec());
        }
        zones
            .iter()
            .map(|identifier| {
                self.registry
                    .resolve(identifier)
                    .cloned()
                    .ok_or_else(|| CoreError::UnknownZone {
                        identifier: identifier.clone(),
                    })
            })
            .collect()
    }
}
