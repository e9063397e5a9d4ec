use crate::engine::ExclusionRules;
use crate::error::{ModlistError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_SETTINGS_FILE: &str = "modlist.toml";

/// User preferences that feed one list build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub updates: UpdateSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    /// Module ids whose updates are never surfaced.
    pub excludes: Vec<String>,
    /// `moduleId:<spec>` version rules.
    pub excluded_versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub disable_low_quality_filter: bool,
    pub showcase_mode: bool,
    pub web_view_available: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            disable_low_quality_filter: false,
            showcase_mode: false,
            web_view_available: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ModlistError::Settings(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::from_lists(&self.updates.excludes, &self.updates.excluded_versions)
    }
}
