//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "zonetune",
    version,
    about = "Sync custom music into the game's zone save slots",
    long_about = "Download a track, derive its beat timing, and wire it into \
                  one of the game's zones.\n\n\
                  The save file references permanently-named links, so after \
                  the first sync a zone's track can be swapped without ever \
                  editing the save file again."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file (default: zonetune.json).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Game installation directory (overrides the config).
    #[arg(long = "game-dir", value_name = "DIR", global = true)]
    pub game_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download a track and assign it to a zone.
    Sync(SyncArgs),

    /// Reset zones back to their default music.
    Reset(ResetArgs),

    /// List all known zones.
    Zones,
}

#[derive(Parser)]
pub struct SyncArgs {
    /// Media link, anything the downloader accepts.
    #[arg(value_name = "LINK")]
    pub link: String,

    /// Target zone (any alias, case-insensitive; see `zonetune zones`).
    #[arg(value_name = "ZONE")]
    pub zone: String,

    /// Synthesize beats at this BPM instead of running the beat tracker.
    #[arg(long = "bpm", value_name = "BPM")]
    pub bpm: Option<f64>,

    /// Shift synthesized beats forward by this many seconds.
    #[arg(long = "offset", value_name = "SECONDS", requires = "bpm")]
    pub offset: Option<f64>,

    /// Beat-tracker executable (default: the game's bundled tracker).
    #[arg(long = "beat-tracker", value_name = "PATH")]
    pub beat_tracker: Option<PathBuf>,

    /// Re-download and re-beatmap even when cached files exist.
    #[arg(long = "force-reload")]
    pub force: bool,

    /// Back up the save file before writing.
    #[arg(long = "backup")]
    pub backup: bool,

    /// Only write the target zone's attribute, not every zone's.
    ///
    /// By default all zones are pointed at their stable link names in one
    /// pass, so the save file never needs editing again.
    #[arg(long = "no-prepare-all")]
    pub no_prepare_all: bool,

    /// Explicit save file path (bypasses config and auto-detection).
    #[arg(long = "save-file", value_name = "PATH")]
    pub save_file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ResetArgs {
    /// Zones to reset, or "all".
    #[arg(value_name = "ZONE", required = true)]
    pub zones: Vec<String>,

    /// Explicit save file path (bypasses config and auto-detection).
    #[arg(long = "save-file", value_name = "PATH")]
    pub save_file: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_args_parse() {
        let cli = Cli::parse_from([
            "zonetune",
            "sync",
            "https://example.com/watch?v=abc",
            "zone1-1",
            "--bpm",
            "120",
            "--offset",
            "0.25",
            "--force-reload",
        ]);
        match cli.command {
            Command::Sync(args) => {
                assert_eq!(args.zone, "zone1-1");
                assert_eq!(args.bpm, Some(120.0));
                assert_eq!(args.offset, Some(0.25));
                assert!(args.force);
                assert!(!args.backup);
            }
            _ => panic!("expected sync command"),
        }
    }

    #[test]
    fn reset_requires_at_least_one_zone() {
        assert!(Cli::try_parse_from(["zonetune", "reset"]).is_err());
        assert!(Cli::try_parse_from(["zonetune", "reset", "all"]).is_ok());
    }
}
