//! # Entity Configuration
//!
//! Sizing and policy knobs for an [`crate::store::EntityStore`], loadable
//! from a TOML file at session start. Defaults mirror the historical
//! constants the savegame format assumes.

use serde::{Deserialize, Serialize};

use midway_shared::constants::{LITTER_CEILING, MAX_ENTITIES, MISC_QUOTA};

/// Configuration for the entity subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Total slot capacity. Fixed for the session.
    pub capacity: usize,
    /// Misc-effect list quota (reserved-capacity policy).
    pub misc_quota: u16,
    /// Litter ceiling before newest-first eviction kicks in.
    pub litter_ceiling: u16,
    /// Cheat: disable litter creation entirely.
    pub disable_littering: bool,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_ENTITIES,
            misc_quota: MISC_QUOTA,
            litter_ceiling: LITTER_CEILING,
            disable_littering: false,
        }
    }
}

impl EntityConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error for malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an IO error message for unreadable files or the parse error
    /// for malformed TOML.
    pub fn from_toml(path: &std::path::Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_toml_str(&text).map_err(|e| e.to_string())
    }
}
