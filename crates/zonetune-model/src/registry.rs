//! Case-insensitive, alias-aware zone lookup.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ModelError, Result};
use crate::zone::{ZoneDescriptor, ZoneTable};

/// Immutable table of zones, indexed by every alias.
///
/// Lookup is total: an unknown identifier resolves to `None`, never an error.
/// Callers decide whether absence is fatal.
#[derive(Debug, Clone)]
pub struct ZoneRegistry {
    zones: Vec<ZoneDescriptor>,
    lookup: HashMap<String, usize>,
}

impl ZoneRegistry {
    /// Build a registry, validating slot-index uniqueness.
    pub fn new(zones: Vec<ZoneDescriptor>) -> Result<Self> {
        let mut lookup = HashMap::new();
        let mut slots: HashMap<u32, usize> = HashMap::new();

        for (index, zone) in zones.iter().enumerate() {
            if let Some(&previous) = slots.get(&zone.slot_index) {
                return Err(ModelError::DuplicateSlot {
                    slot: zone.slot_index,
                    first: zones[previous].id.clone(),
                    second: zone.id.clone(),
                });
            }
            slots.insert(zone.slot_index, index);

            for alias in &zone.aliases {
                // First zone to claim an alias wins; later duplicates are
                // shadowed rather than rejected, matching table order.
                lookup.entry(alias.to_lowercase()).or_insert(index);
            }
        }

        Ok(Self { zones, lookup })
    }

    /// The default zone table shipped with the tool.
    pub fn builtin() -> Self {
        let mut zones = Vec::new();
        for zone_number in 1u32..=5 {
            for stage in 1u32..=3 {
                let slot = (zone_number - 1) * 3 + (stage - 1);
                zones.push(ZoneDescriptor {
                    id: format!("{zone_number}-{stage}"),
                    aliases: vec![
                        format!("{zone_number}-{stage}"),
                        format!("z{zone_number}-{stage}"),
                        format!("zone{zone_number}-{stage}"),
                    ],
                    slot_index: slot,
                });
            }
        }
        zones.push(ZoneDescriptor {
            id: "lobby".to_string(),
            aliases: vec!["lobby".to_string(), "hub".to_string()],
            slot_index: 15,
        });
        zones.push(ZoneDescriptor {
            id: "training".to_string(),
            aliases: vec!["training".to_string(), "tutorial".to_string()],
            slot_index: 16,
        });

        Self::new(zones).expect("builtin zone table is valid")
    }

    /// Load an external zone table from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::TableRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            ModelError::TableParse { source, .. } => ModelError::TableParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse a zone table from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let table: ZoneTable =
            serde_json::from_str(content).map_err(|e| ModelError::TableParse {
                path: std::path::PathBuf::new(),
                source: e,
            })?;

        let mut zones = Vec::with_capacity(table.zones.len());
        for (index, entry) in table.zones.into_iter().enumerate() {
            let zone = ZoneDescriptor::new(entry.names, entry.game_index)
                .ok_or(ModelError::EmptyNames { index })?;
            zones.push(zone);
        }
        Self::new(zones)
    }

    /// Resolve any alias, case-insensitively.
    pub fn resolve(&self, identifier: &str) -> Option<&ZoneDescriptor> {
        let key = identifier.to_lowercase();
        self.lookup.get(&key).map(|&index| &self.zones[index])
    }

    /// All zones in declaration order.
    pub fn all(&self) -> &[ZoneDescriptor] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
