use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use zonetune_core::{Config, Orchestrator, ProcessOptions, ProcessOutcome, ResetOutcome};
use zonetune_media::YtDlpFetcher;
use zonetune_model::ZoneRegistry;

use crate::cli::{Cli, ResetArgs, SyncArgs};

const DEFAULT_CONFIG_FILE: &str = "zonetune.json";

pub fn run_sync(cli: &Cli, args: &SyncArgs) -> Result<ProcessOutcome> {
    let (config, config_path) = load_config(cli)?;
    let orchestrator = build_orchestrator(&config)?;

    let options = ProcessOptions {
        link: args.link.clone(),
        zone: args.zone.clone(),
        bpm: args.bpm,
        offset_seconds: args.offset,
        beat_tracker: args.beat_tracker.clone(),
        force: args.force,
        backup: args.backup,
        prepare_all_zones: !args.no_prepare_all,
        save_file: args.save_file.clone(),
    };
    let outcome = orchestrator.full_process(&options)?;

    // Remember a freshly detected save file so later runs skip detection.
    if outcome.save_detected && config.save_file.is_none() {
        record_detected_save(&config, &config_path, &outcome.save_path);
    }

    Ok(outcome)
}

pub fn run_reset(cli: &Cli, args: &ResetArgs) -> Result<ResetOutcome> {
    let (config, _) = load_config(cli)?;
    let orchestrator = build_orchestrator(&config)?;
    let outcome = orchestrator.reset_zones(args.save_file.as_deref(), &args.zones)?;
    Ok(outcome)
}

pub fn load_registry(config: &Config) -> Result<ZoneRegistry> {
    match &config.zone_table {
        Some(path) => ZoneRegistry::from_json_file(path)
            .with_context(|| format!("load zone table {}", path.display())),
        None => Ok(ZoneRegistry::builtin()),
    }
}

pub fn load_config(cli: &Cli) -> Result<(Config, PathBuf)> {
    let (path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let mut config = if explicit {
        Config::load(&path)?
    } else {
        Config::load_or_default(&path)?
    };

    if let Some(game_dir) = &cli.game_dir {
        config.game_dir = Some(game_dir.clone());
    }
    Ok((config, path))
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator<YtDlpFetcher>> {
    let registry = load_registry(config)?;
    let downloader = config
        .downloader
        .clone()
        .unwrap_or_else(|| PathBuf::from("yt-dlp"));
    let fetcher = YtDlpFetcher::new(downloader);
    let orchestrator = Orchestrator::new(registry, config.clone(), fetcher)?;
    Ok(orchestrator)
}

fn record_detected_save(config: &Config, config_path: &Path, save_path: &Path) {
    let Some(name) = save_path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return;
    };
    let mut updated = config.clone();
    updated.save_file = Some(name.clone());
    match updated.store(config_path) {
        Ok(()) => info!(save_file = %name, config = %config_path.display(), "config updated"),
        Err(error) => {
            warn!(%error, "failed to record the detected save file in the config");
        }
    }
}
