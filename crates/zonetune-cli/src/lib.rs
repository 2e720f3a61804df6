//! CLI library components for zonetune.

pub mod logging;
