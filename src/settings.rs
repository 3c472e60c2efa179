//! JSON settings for [`TileMap`](crate::TileMap).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::loader::tmx_loader::{HiddenObjectGroup, ParseOptions};

/// Host-side knobs for loading and presenting a map.
///
/// Reads from JSON; unknown fields are ignored and missing ones take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileMapSettings {
    /// Folder prefixed to every atlas lookup key. Empty means none.
    pub tile_folder: String,
    /// Layer pixels per world unit.
    pub unit: f32,
    /// Forwarded to [`ParseOptions`].
    pub hidden_object_group: HiddenObjectGroup,
}

impl Default for TileMapSettings {
    fn default() -> Self {
        TileMapSettings {
            tile_folder: String::new(),
            unit: 100.0,
            hidden_object_group: HiddenObjectGroup::default(),
        }
    }
}

impl TileMapSettings {
    /// Parses settings from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| MapError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&txt)
    }

    /// Parser options implied by these settings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            hidden_object_group: self.hidden_object_group,
        }
    }
}
