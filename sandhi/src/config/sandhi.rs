//! Main SandhiConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigLoadError;
use super::sections::{IndexSection, MatchingSection, ProgressSection};

/// Default config file location, relative to the working directory
const DEFAULT_CONFIG_PATH: &str = "configs/sandhi.yaml";

/// Full sandhi configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct SandhiConfig {
    /// Candidate generation settings
    #[serde(default)]
    pub matching: MatchingSection,

    /// Spatial index settings
    #[serde(default)]
    pub index: IndexSection,

    /// Progress reporting settings
    #[serde(default)]
    pub progress: ProgressSection,
}

impl SandhiConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/sandhi.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("{} not found, using default configuration", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.matching.validate()?;
        self.progress.validate()
    }
}
