//! YAML configuration file support.
//!
//! A single YAML document configures the matcher; anything omitted falls
//! back to [`MatchingConfig::default`].
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "municipal elections"
//!
//! matcher:
//!   distance_metric: "manhattan"      # manhattan | directional | euclidean
//!   missing_value:
//!     method: "relative_maximum"      # neutral | relative_maximum
//!     bias: "positive"                # positive | negative
//!   allow_missing_reference: true
//!   use_parallel: false
//! ```

use std::fs;
use std::path::Path;

use matcher::{MatchingAlgorithm, MatchingConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VaaConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub matcher: MatchingConfig,
}

impl VaaConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: VaaConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;
        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))
    }

    /// Build the algorithm this configuration describes.
    pub fn matching_algorithm(&self) -> Result<MatchingAlgorithm, ConfigLoadError> {
        MatchingAlgorithm::new(self.matcher.clone())
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))
    }
}

impl Default for VaaConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            matcher: MatchingConfig::default(),
        }
    }
}
