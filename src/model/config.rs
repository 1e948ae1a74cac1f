use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::theme::Appearance;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Write a few sample tasks when no task list has been saved yet
    #[serde(default = "default_true")]
    pub seed_samples: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { seed_samples: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Used for the `auto` theme when the terminal does not report its background
    #[serde(default = "default_appearance")]
    pub fallback_appearance: Appearance,
    #[serde(default)]
    pub colors: PaletteOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            fallback_appearance: default_appearance(),
            colors: PaletteOverrides::default(),
        }
    }
}

/// Hex color overrides keyed by palette slot, one table per appearance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteOverrides {
    #[serde(default)]
    pub light: HashMap<String, String>,
    #[serde(default)]
    pub dark: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// trace|debug|info|warn|error; absent = build default
    #[serde(default)]
    pub level: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_appearance() -> Appearance {
    Appearance::Dark
}
