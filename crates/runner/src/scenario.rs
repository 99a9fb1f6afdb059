//! Scenario files for repeatable placement runs.
//!
//! A scenario names an optional base [`Preset`] and overrides any part of it:
//! the room, the catalog, or individual [`LayoutConfig`] fields. Scenarios are
//! stored as TOML or JSON; the format is chosen by file extension.
//!
//! ```toml
//! name = "tight living room"
//! preset = "limited"
//!
//! [config]
//! min_spacing = 0.5
//! grid_step = 0.25
//! ```

use roomfit_core::{Error as LayoutError, FurnitureArchetype, LayoutConfig, Room};
use roomfit_placement::Preset;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A placement scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, used in reports.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Disabled scenarios are skipped by batch runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Preset supplying the room, catalog and config not overridden here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    /// Replaces the preset's room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    /// Replaces the preset's catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<FurnitureArchetype>>,
    /// Field-level overrides applied on top of the base configuration.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub config: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

/// Everything a placement run needs.
#[derive(Debug, Clone)]
pub struct ScenarioSetup {
    pub room: Room,
    pub catalog: Vec<FurnitureArchetype>,
    pub config: LayoutConfig,
}

/// Error type for scenario operations.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl Scenario {
    /// A scenario that runs a preset unchanged.
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            name: preset.name().to_string(),
            description: preset.description().to_string(),
            enabled: true,
            preset: Some(preset),
            room: None,
            catalog: None,
            config: Map::new(),
        }
    }

    /// Overrides a single config field.
    pub fn with_override(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(field.into(), value.into());
        self
    }

    /// Parses a scenario from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        toml::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))
    }

    /// Parses a scenario from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, ScenarioError> {
        serde_json::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))
    }

    /// Loads a scenario from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Loads a scenario from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Loads a scenario, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        match Format::of(path)? {
            Format::Toml => Self::from_toml_file(path),
            Format::Json => Self::from_json_file(path),
        }
    }

    /// Writes the scenario, picking the format from the file extension.
    pub fn save(&self, path: &Path) -> Result<(), ScenarioError> {
        let content = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ScenarioError::Parse(e.to_string()))?
            }
            Format::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ScenarioError::Parse(e.to_string()))?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolves the base preset and overrides into a validated setup.
    pub fn build(&self) -> Result<ScenarioSetup, ScenarioError> {
        let room = match (&self.room, self.preset) {
            (Some(room), _) => room.clone(),
            (None, Some(preset)) => preset.room()?,
            (None, None) => return Err(self.missing("room")),
        };
        let catalog = match (&self.catalog, self.preset) {
            (Some(catalog), _) => catalog.clone(),
            (None, Some(preset)) => preset.catalog(),
            (None, None) => return Err(self.missing("catalog")),
        };
        let base = self.preset.map_or_else(LayoutConfig::default, |p| p.config());
        let config = apply_overrides(base, &self.config)?;

        room.validate()?;
        room.validate_catalog(&catalog)?;
        config.validate()?;

        Ok(ScenarioSetup {
            room,
            catalog,
            config,
        })
    }

    fn missing(&self, what: &str) -> ScenarioError {
        ScenarioError::Layout(LayoutError::InvalidConfiguration(format!(
            "scenario '{}' has no {what} and no base preset",
            self.name
        )))
    }
}

/// Applies field-level overrides to a configuration.
///
/// Unknown field names are rejected so that typos do not silently fall back
/// to the base value.
pub fn apply_overrides(
    base: LayoutConfig,
    overrides: &Map<String, Value>,
) -> Result<LayoutConfig, ScenarioError> {
    if overrides.is_empty() {
        return Ok(base);
    }
    let mut value = serde_json::to_value(&base).map_err(|e| ScenarioError::Parse(e.to_string()))?;
    let Value::Object(fields) = &mut value else {
        return Err(ScenarioError::Parse("configuration is not an object".into()));
    };
    for (key, override_value) in overrides {
        match fields.get_mut(key) {
            Some(slot) => *slot = override_value.clone(),
            None => {
                return Err(ScenarioError::Parse(format!(
                    "unknown config field '{key}'"
                )))
            }
        }
    }
    serde_json::from_value(value).map_err(|e| ScenarioError::Parse(e.to_string()))
}

/// Loads every `.toml` / `.json` scenario in a directory, sorted by path.
pub fn load_dir(dir: &Path) -> Result<Vec<(PathBuf, Scenario)>, ScenarioError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && Format::of(path).is_ok())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let scenario = Scenario::load(&path)?;
            Ok((path, scenario))
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ScenarioError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            _ => Err(ScenarioError::Parse(format!(
                "unsupported scenario file '{}' (expected .toml or .json)",
                path.display()
            ))),
        }
    }
}
