//! The save-file editor state machine.
//!
//! `Unloaded -> Loaded -> (Dirty | Clean) -> Persisted`. The editor owns the
//! document exclusively for the duration of one load/mutate/persist
//! transaction; no other component sees the tree.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use zonetune_model::{CustomSongValue, ZoneRegistry, to_game_path};

use crate::document::SaveDocument;
use crate::error::{Result, SaveError};

pub struct SaveFileEditor<'a> {
    path: PathBuf,
    registry: &'a ZoneRegistry,
    document: Option<SaveDocument>,
    dirty: bool,
}

impl<'a> SaveFileEditor<'a> {
    pub fn new(path: &Path, registry: &'a ZoneRegistry) -> Self {
        Self {
            path: path.to_path_buf(),
            registry,
            document: None,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and parse the save file.
    pub fn load(&mut self) -> Result<()> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SaveError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                SaveError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        self.document = Some(SaveDocument::parse(&content)?);
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "save file loaded");
        Ok(())
    }

    /// Current custom-song value for a zone. `None` means the attribute has
    /// never been written for that zone.
    pub fn custom_song(&self, zone_identifier: &str) -> Result<Option<CustomSongValue>> {
        let document = self.document.as_ref().ok_or(SaveError::NotLoaded)?;
        let zone = self
            .registry
            .resolve(zone_identifier)
            .ok_or_else(|| SaveError::UnknownZone {
                identifier: zone_identifier.to_string(),
            })?;
        Ok(document.custom_song(zone.slot_index))
    }

    /// Assign a custom song to a zone, or clear it with `None`.
    ///
    /// Marks the editor dirty only when the stored value actually changes, so
    /// repeating the same assignment is a no-op.
    pub fn set_custom_song(&mut self, zone_identifier: &str, path: Option<&Path>) -> Result<()> {
        let document = self.document.as_mut().ok_or(SaveError::NotLoaded)?;
        let zone = self
            .registry
            .resolve(zone_identifier)
            .ok_or_else(|| SaveError::UnknownZone {
                identifier: zone_identifier.to_string(),
            })?;

        let value = match path {
            Some(path) => CustomSongValue::Path(to_game_path(path)),
            None => CustomSongValue::Default,
        };

        if document.set_custom_song(zone.slot_index, &value) {
            tracing::debug!(
                zone = %zone.id,
                attribute = %zone.attribute_name(),
                value = %value.as_attribute_value(),
                "save attribute changed"
            );
            self.dirty = true;
        }
        Ok(())
    }

    /// Write the document back, all-or-nothing.
    ///
    /// Serializes to a temp file in the same directory and renames it over
    /// the save file, so a failure mid-write never leaves a partial document.
    pub fn persist(&mut self) -> Result<()> {
        let document = self.document.as_ref().ok_or(SaveError::NotLoaded)?;
        let bytes = document.to_bytes()?;

        let temp_path = sibling_path(&self.path, ".tmp");
        let mut file = File::create(&temp_path).map_err(|e| SaveError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| SaveError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| SaveError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| SaveError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source: e,
        })?;

        self.dirty = false;
        tracing::info!(path = %self.path.display(), "save file written");
        Ok(())
    }

    /// Copy the save file to a timestamped sibling path.
    ///
    /// Refuses to overwrite an existing backup: millisecond granularity makes
    /// collisions unlikely, and a collision fails loudly instead.
    pub fn backup(&self) -> Result<PathBuf> {
        self.backup_with_timestamp(Utc::now().timestamp_millis())
    }

    fn backup_with_timestamp(&self, timestamp: i64) -> Result<PathBuf> {
        let backup_path = sibling_path(&self.path, &format!("-backup-{timestamp}"));

        if backup_path.exists() {
            return Err(SaveError::BackupExists { path: backup_path });
        }

        fs::copy(&self.path, &backup_path).map_err(|e| SaveError::Io {
            operation: "copy",
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!(path = %backup_path.display(), "save file backed up");
        Ok(backup_path)
    }
}

/// Append a suffix to the full file name, keeping the directory.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("save"));
    name.push(suffix);
    path.with_file_name(name)
}
