//! Media acquisition and beatmap generation.
//!
//! The heavy lifting is delegated to external collaborators: a yt-dlp
//! compatible downloader for audio, and either a beat-detection executable or
//! a synthetic fixed-BPM generator for beat timing. This crate wraps both
//! behind capability traits and sequences them into an idempotent pipeline.

pub mod beats;
pub mod error;
pub mod fetcher;
pub mod pipeline;

pub use beats::{BeatSource, ExecutableDetector, FixedBpm};
pub use error::{MediaError, Result};
pub use fetcher::{MediaFetcher, MediaInfo, YtDlpFetcher};
pub use pipeline::{AcquireOptions, MediaPipeline, PipelineResult};
