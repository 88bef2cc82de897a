//! Calculator configuration
//!
//! Every field has a default, so a missing config file is the same as an
//! empty one. Values can be overridden from the command line after loading.

use crate::core::error::{CalcError, Result};
use crate::core::types::{Level, DEFAULT_LEVEL_STEP};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the Citrine-per-book figure is read from
///
/// Some data sets carry the cost on every ability, others only on the
/// cultivation stage. Exactly one source is consulted per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitrineSource {
    Ability,
    #[default]
    Stage,
}

impl std::str::FromStr for CitrineSource {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ability" => Ok(CitrineSource::Ability),
            "stage" => Ok(CitrineSource::Stage),
            other => Err(CalcError::Config(format!(
                "citrine_source must be 'ability' or 'stage', got '{}'",
                other
            ))),
        }
    }
}

/// Locations of the three reference tables
///
/// Each entry is either a filesystem path or an `http(s)://` URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub abilities: String,
    pub stages: String,
    pub breakthroughs: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("data"))
    }
}

impl DataConfig {
    /// Standard file names inside a data directory
    pub fn in_dir(dir: &Path) -> Self {
        let join = |name: &str| dir.join(name).to_string_lossy().into_owned();
        Self {
            abilities: join("abilities.json"),
            stages: join("stages.json"),
            breakthroughs: join("breakthroughs.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Which record supplies `citrinePerBook`
    pub citrine_source: CitrineSource,

    /// Granularity of stored levels
    ///
    /// Levels are snapped to the nearest multiple of this value. Ability
    /// `maxLevel` values are expected to be multiples of it too.
    pub level_step: Level,

    /// Reference data locations
    pub data: DataConfig,

    /// JSON file holding the user's levels
    pub store_path: PathBuf,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            citrine_source: CitrineSource::default(),
            level_step: DEFAULT_LEVEL_STEP,
            data: DataConfig::default(),
            store_path: PathBuf::from("citrine_levels.json"),
        }
    }
}

impl CalculatorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CalculatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalcError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.level_step == 0 {
            return Err(CalcError::Config("level_step must be positive".into()));
        }

        let sources = [
            ("data.abilities", &self.data.abilities),
            ("data.stages", &self.data.stages),
            ("data.breakthroughs", &self.data.breakthroughs),
        ];
        for (key, value) in sources {
            if value.trim().is_empty() {
                return Err(CalcError::Config(format!("{} must not be empty", key)));
            }
        }

        if self.store_path.as_os_str().is_empty() {
            return Err(CalcError::Config("store_path must not be empty".into()));
        }

        Ok(())
    }
}
