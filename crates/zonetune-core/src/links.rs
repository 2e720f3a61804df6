//! The stable-name indirection layer.
//!
//! Each zone owns two permanently-named links, one for audio and one for the
//! beatmap. Save-file attributes reference the stable names, so once written
//! they never need another edit: swapping a zone's track only retargets the
//! link. The stable name for a zone never changes across runs.

use std::path::{Path, PathBuf};

use zonetune_model::ZoneDescriptor;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Audio,
    Beatmap,
}

#[derive(Debug, Clone)]
pub struct LinkLayer {
    /// Stable audio links.
    audio_dir: PathBuf,
    /// Stable beatmap links; the game reads these from its custom_music dir.
    beatmap_dir: PathBuf,
}

impl LinkLayer {
    pub fn new(audio_dir: impl Into<PathBuf>, beatmap_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            beatmap_dir: beatmap_dir.into(),
        }
    }

    /// The permanent path for a zone's link of the given kind.
    pub fn stable_path(&self, zone: &ZoneDescriptor, kind: LinkKind) -> PathBuf {
        match kind {
            LinkKind::Audio => self.audio_dir.join(zone.song_file_name()),
            LinkKind::Beatmap => self
                .beatmap_dir
                .join(format!("{}.txt", zone.song_file_name())),
        }
    }

    /// Point a zone's stable link at `target`, replacing any previous target.
    ///
    /// A missing target is a caller precondition violation and fails with
    /// `InvalidTarget` before anything is touched; dangling links are never
    /// created deliberately. Replacement is remove-then-recreate, which is
    /// fine in this single-writer setting.
    pub fn point(&self, zone: &ZoneDescriptor, kind: LinkKind, target: &Path) -> Result<()> {
        if !target.exists() {
            return Err(CoreError::InvalidTarget {
                path: target.to_path_buf(),
            });
        }

        let link = self.stable_path(zone, kind);
        if let Some(parent) = link.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Io {
                operation: "create link directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        if std::fs::symlink_metadata(&link).is_ok() {
            std::fs::remove_file(&link).map_err(|e| CoreError::Io {
                operation: "remove old link",
                path: link.clone(),
                source: e,
            })?;
        }

        create_symlink(target, &link).map_err(|e| CoreError::Io {
            operation: "create link",
            path: link.clone(),
            source: e,
        })?;
        tracing::debug!(
            zone = %zone.id,
            link = %link.display(),
            target = %target.display(),
            "stable link updated"
        );
        Ok(())
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
