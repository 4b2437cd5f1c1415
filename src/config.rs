//! YAML configuration file support for geolink.
//!
//! One document configures every component. Each section is optional and
//! falls back to the component defaults; unknown keys inside a section are
//! ignored.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "novosibirsk listings"
//!
//! normalizer:
//!   version: 1
//!   normalize_unicode: true
//!   lowercase: true
//!   transliterate_cyrillic: true
//!   default_stop_tokens: true
//!   extra_stop_tokens: ["mkr", "mikrorayon"]
//!
//! similarity:
//!   edit_weight: 0.4
//!   token_weight: 0.4
//!   bigram_weight: 0.2
//!
//! resolver:
//!   exact_radius_m: 30
//!   near_radius_m: 100
//!   extended_radius_m: 300
//!   near_text_threshold: 0.85
//!   extended_text_threshold: 0.65
//!   global_text_threshold: 0.40
//!   high_tier_threshold: 0.85
//!   text_weight: 0.6
//!   distance_weight: 0.4
//!   distance_norm_m: 300
//!
//! batch:
//!   progress_every: 10
//!   workers: 4
//! ```

use std::fs;
use std::path::Path;

use canonical::NormalizerConfig;
use matcher::{LinkageConfig, ResolverConfig};
use serde::{Deserialize, Serialize};
use similarity::SimilarityConfig;
use thiserror::Error;

use crate::batch::BatchConfig;

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

/// Top-level YAML configuration for a linkage run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GeolinkConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

impl GeolinkConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: GeolinkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the format version and every section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.linkage()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.batch
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        Ok(())
    }

    /// Sections consumed by [`LinkageContext`](matcher::LinkageContext).
    pub fn linkage(&self) -> LinkageConfig {
        LinkageConfig {
            normalizer: self.normalizer.clone(),
            similarity: self.similarity.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl Default for GeolinkConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalizer: NormalizerConfig::default(),
            similarity: SimilarityConfig::default(),
            resolver: ResolverConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}
