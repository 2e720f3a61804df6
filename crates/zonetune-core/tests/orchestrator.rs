//! End-to-end orchestrator tests with a stubbed download collaborator.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use zonetune_core::{Config, CoreError, Orchestrator, ProcessOptions};
use zonetune_media::{MediaError, MediaFetcher, MediaInfo};
use zonetune_model::{NO_CUSTOM_SONG, ZoneRegistry};

const SAVE: &str = "<?xml?><save><game version=\"84\" gold=\"1234\"/></save>";

struct StubFetcher {
    id: String,
    duration: f64,
    probes: Cell<usize>,
    fetches: Cell<usize>,
}

impl StubFetcher {
    fn new(id: &str, duration: f64) -> Self {
        Self {
            id: id.to_string(),
            duration,
            probes: Cell::new(0),
            fetches: Cell::new(0),
        }
    }
}

impl MediaFetcher for StubFetcher {
    fn probe(&self, _link: &str) -> Result<MediaInfo, MediaError> {
        self.probes.set(self.probes.get() + 1);
        Ok(MediaInfo {
            id: self.id.clone(),
            duration_seconds: self.duration,
        })
    }

    fn fetch(&self, _link: &str, output_stem: &Path) -> Result<(), MediaError> {
        self.fetches.set(self.fetches.get() + 1);
        let path = PathBuf::from(format!("{}.mp3", output_stem.display()));
        std::fs::write(path, b"audio").unwrap();
        Ok(())
    }
}

/// Game directory with a data folder and one save file.
fn game_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    let save = data.join("save_data0.xml");
    std::fs::write(&save, SAVE).unwrap();
    (dir, save)
}

fn orchestrator(dir: &TempDir) -> Orchestrator<StubFetcher> {
    let config = Config {
        game_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    Orchestrator::new(ZoneRegistry::builtin(), config, StubFetcher::new("abc123", 2.5)).unwrap()
}

fn sync_options() -> ProcessOptions {
    let mut options = ProcessOptions::new("https://example.com/watch?v=abc123", "zone1-1");
    options.bpm = Some(120.0);
    options
}

#[cfg(unix)]
#[test]
fn full_process_writes_stable_link_paths_into_the_save() {
    let (dir, save) = game_dir();
    let orchestrator = orchestrator(&dir);

    let outcome = orchestrator.full_process(&sync_options()).unwrap();
    assert!(!outcome.media_skipped);
    assert!(!outcome.beatmap_skipped);
    assert!(outcome.save_written);
    assert!(outcome.save_detected);
    assert_eq!(outcome.save_path, save);

    // The pipeline artifacts exist and the stable links resolve to them.
    assert!(outcome.media_path.exists());
    assert_eq!(
        std::fs::read_to_string(&outcome.beatmap_path).unwrap(),
        "0\n0.5\n1\n1.5\n2"
    );
    let audio_link = dir
        .path()
        .join("data/zonetune/links/song_1-1.mp3");
    assert_eq!(std::fs::read_link(&audio_link).unwrap(), outcome.media_path);
    let beatmap_link = dir.path().join("data/custom_music/song_1-1.mp3.txt");
    assert_eq!(
        std::fs::read_link(&beatmap_link).unwrap(),
        outcome.beatmap_path
    );

    // The save references the stable link, not the download path, and
    // untouched attributes survive.
    let content = std::fs::read_to_string(&save).unwrap();
    let expected = zonetune_model::to_game_path(&audio_link);
    assert!(content.contains(&format!("customSong0=\"{expected}\"")));
    assert!(content.contains("gold=\"1234\""));
    assert!(content.starts_with("<?xml?>"));

    // Every zone was prepared, not just the target.
    assert!(content.contains("customSong15=")); // lobby
    assert!(content.contains("song_lobby.mp3"));
}

#[cfg(unix)]
#[test]
fn second_identical_run_is_a_no_op_on_disk() {
    let (dir, save) = game_dir();
    let orchestrator = orchestrator(&dir);

    orchestrator.full_process(&sync_options()).unwrap();
    let after_first = std::fs::read(&save).unwrap();

    let outcome = orchestrator.full_process(&sync_options()).unwrap();
    assert!(outcome.media_skipped);
    assert!(outcome.beatmap_skipped);
    assert!(!outcome.save_written);
    assert_eq!(std::fs::read(&save).unwrap(), after_first);
}

#[cfg(unix)]
#[test]
fn force_redownloads_but_leaves_the_save_attribute_unchanged() {
    let (dir, save) = game_dir();
    let orchestrator = orchestrator(&dir);

    orchestrator.full_process(&sync_options()).unwrap();
    let after_first = std::fs::read(&save).unwrap();

    let mut options = sync_options();
    options.force = true;
    let outcome = orchestrator.full_process(&options).unwrap();
    assert!(!outcome.media_skipped);
    assert!(!outcome.beatmap_skipped);
    // The stable link path is already in the save, so nothing changes there.
    assert!(!outcome.save_written);
    assert_eq!(std::fs::read(&save).unwrap(), after_first);
}

#[test]
fn unknown_zone_fails_before_any_io() {
    let (dir, save) = game_dir();
    let config = Config {
        game_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let fetcher = StubFetcher::new("abc123", 2.5);
    let orchestrator = Orchestrator::new(ZoneRegistry::builtin(), config, fetcher).unwrap();

    let options = ProcessOptions::new("link", "atlantis");
    let result = orchestrator.full_process(&options);
    assert!(matches!(result, Err(CoreError::UnknownZone { .. })));

    // Nothing was probed, downloaded, or written.
    assert!(!dir.path().join("data/zonetune").exists());
    assert_eq!(std::fs::read_to_string(&save).unwrap(), SAVE);
}

#[test]
fn invalid_bpm_fails_before_the_pipeline_runs() {
    let (dir, _) = game_dir();
    let orchestrator = orchestrator(&dir);

    let mut options = sync_options();
    options.bpm = Some(-3.0);
    let result = orchestrator.full_process(&options);
    assert!(matches!(
        result,
        Err(CoreError::Media(MediaError::InvalidBpm { .. }))
    ));
    assert!(!dir.path().join("data/zonetune").exists());
}

#[cfg(unix)]
#[test]
fn backup_is_taken_before_the_edit_lands() {
    let (dir, _) = game_dir();
    let orchestrator = orchestrator(&dir);

    let mut options = sync_options();
    options.backup = true;
    let outcome = orchestrator.full_process(&options).unwrap();

    let backup_path = outcome.backup_path.unwrap();
    // The backup holds the pre-edit document.
    assert_eq!(std::fs::read_to_string(&backup_path).unwrap(), SAVE);
}

/// Log writer that collects formatted events for inspection.
#[derive(Clone)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn reset_all_sets_every_zone_to_the_sentinel_in_one_write() {
    let (dir, save) = game_dir();
    let orchestrator = orchestrator(&dir);

    // The editor logs every persisted write; capture them to count.
    let logs = Arc::new(Mutex::new(Vec::new()));
    let writer = CaptureWriter(Arc::clone(&logs));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let outcome = tracing::subscriber::with_default(subscriber, || {
        orchestrator.reset_zones(None, &["all".to_string()])
    })
    .unwrap();
    assert_eq!(outcome.zones_reset, ZoneRegistry::builtin().len());
    assert_eq!(outcome.save_path, save);

    let logs = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
    assert_eq!(logs.matches("save file written").count(), 1);

    let content = std::fs::read_to_string(&save).unwrap();
    for zone in ZoneRegistry::builtin().all() {
        assert!(
            content.contains(&format!(
                "{}=\"{NO_CUSTOM_SONG}\"",
                zone.attribute_name()
            )),
            "zone {} not reset",
            zone.id
        );
    }
    assert!(content.contains("gold=\"1234\""));
}

#[test]
fn reset_with_unknown_zone_touches_nothing() {
    let (dir, save) = game_dir();
    let orchestrator = orchestrator(&dir);

    let zones = vec!["lobby".to_string(), "atlantis".to_string()];
    let result = orchestrator.reset_zones(None, &zones);
    assert!(matches!(result, Err(CoreError::UnknownZone { .. })));
    assert_eq!(std::fs::read_to_string(&save).unwrap(), SAVE);
}

#[test]
fn reset_accepts_aliases() {
    let (dir, save) = game_dir();
    let orchestrator = orchestrator(&dir);

    let zones = vec!["HUB".to_string(), "tutorial".to_string()];
    let outcome = orchestrator.reset_zones(None, &zones).unwrap();
    assert_eq!(outcome.zones_reset, 2);

    let content = std::fs::read_to_string(&save).unwrap();
    assert!(content.contains(&format!("customSong15=\"{NO_CUSTOM_SONG}\"")));
    assert!(content.contains(&format!("customSong16=\"{NO_CUSTOM_SONG}\"")));
    assert!(!content.contains("customSong0="));
}

#[test]
fn missing_game_dir_is_rejected_at_construction() {
    let config = Config::default();
    let result = Orchestrator::new(
        ZoneRegistry::builtin(),
        config,
        StubFetcher::new("x", 1.0),
    );
    assert!(matches!(result, Err(CoreError::GameDirMissing)));

    let config = Config {
        game_dir: Some(PathBuf::from("/nonexistent/game")),
        ..Config::default()
    };
    let result = Orchestrator::new(
        ZoneRegistry::builtin(),
        config,
        StubFetcher::new("x", 1.0),
    );
    assert!(matches!(result, Err(CoreError::GameDirInvalid { .. })));
}

#[test]
fn explicit_save_file_override_wins_over_detection() {
    let (dir, _) = game_dir();
    let other = dir.path().join("data").join("save_data9.xml");
    std::fs::write(&other, SAVE).unwrap();
    let orchestrator = orchestrator(&dir);

    let outcome = orchestrator
        .reset_zones(Some(&other), &["lobby".to_string()])
        .unwrap();
    assert_eq!(outcome.save_path, other);
}
