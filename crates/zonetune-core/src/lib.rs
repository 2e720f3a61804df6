//! Orchestration core: configuration, the stable-link indirection layer, and
//! the end-to-end sync transaction.

pub mod config;
pub mod detect;
pub mod error;
pub mod links;
pub mod orchestrator;

pub use config::Config;
pub use detect::detect_save_file;
pub use error::{CoreError, Result};
pub use links::{LinkKind, LinkLayer};
pub use orchestrator::{Orchestrator, ProcessOptions, ProcessOutcome, ResetOutcome};
