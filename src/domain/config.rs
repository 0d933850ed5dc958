use std::path::Path;

use serde::{Deserialize, Serialize};

use super::LabelMode;

/// Configuration for the question-generation pipeline.
///
/// This struct holds settings that control how generator output is split,
/// labeled, and compared across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of items the generator is asked to produce per point.
    ///
    /// Used when splitting raw generator output into blocks and when
    /// checking that a run's item groups are complete.
    expected_items: usize,

    /// How items are labeled within a point: bare ordinals or
    /// ordinal-plus-letter.
    pub label_mode: LabelMode,

    /// The run whose point order anchors comparison tables.
    ///
    /// When unset, the first run given on the command line is primary.
    pub primary_run: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_items: default_expected_items(),
            label_mode: LabelMode::default(),
            primary_run: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the expected number of items per point.
    #[must_use]
    pub const fn expected_items(&self) -> usize {
        self.expected_items
    }

    /// Sets the expected number of items per point.
    ///
    /// Values below one are clamped to one.
    pub const fn set_expected_items(&mut self, value: usize) {
        self.expected_items = if value == 0 { 1 } else { value };
    }
}

const fn default_expected_items() -> usize {
    3
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_expected_items")]
        expected_items: usize,

        #[serde(default)]
        label_mode: LabelMode,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        primary_run: Option<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                expected_items,
                label_mode,
                primary_run,
            } => Self {
                expected_items: expected_items.max(1),
                label_mode,
                primary_run,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            expected_items: config.expected_items,
            label_mode: config.label_mode,
            primary_run: config.primary_run,
        }
    }
}
