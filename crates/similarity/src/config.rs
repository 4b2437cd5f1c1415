//! Configuration and error types for the similarity scorer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance on the sum of the measure weights.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the three measures in the composite score.
///
/// The weights must be non-negative and sum to 1 so the composite stays in
/// `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Weight of the normalized Levenshtein similarity.
    pub edit_weight: f64,
    /// Weight of the whitespace-token Jaccard index.
    pub token_weight: f64,
    /// Weight of the character-bigram Jaccard index.
    pub bigram_weight: f64,
}

impl SimilarityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edit_weight(mut self, weight: f64) -> Self {
        self.edit_weight = weight;
        self
    }

    pub fn with_token_weight(mut self, weight: f64) -> Self {
        self.token_weight = weight;
        self
    }

    pub fn with_bigram_weight(mut self, weight: f64) -> Self {
        self.bigram_weight = weight;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), SimilarityError> {
        if self.version < 1 {
            return Err(SimilarityError::InvalidConfigVersion {
                version: self.version,
            });
        }
        for (name, value) in [
            ("edit_weight", self.edit_weight),
            ("token_weight", self.token_weight),
            ("bigram_weight", self.bigram_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimilarityError::InvalidWeight { name, value });
            }
        }
        let sum = self.edit_weight + self.token_weight + self.bigram_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SimilarityError::WeightSum { sum });
        }
        Ok(())
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            version: 1,
            edit_weight: 0.4,
            token_weight: 0.4,
            bigram_weight: 0.2,
        }
    }
}

/// Errors returned when configuring the scorer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: {name} must be a finite non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("invalid config: weights must sum to 1 (got {sum})")]
    WeightSum { sum: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SimilarityConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.edit_weight, 0.4);
        assert_eq!(cfg.token_weight, 0.4);
        assert_eq!(cfg.bigram_weight, 0.2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_overrides_weights() {
        let cfg = SimilarityConfig::new()
            .with_edit_weight(0.5)
            .with_token_weight(0.5)
            .with_bigram_weight(0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn negative_or_nan_weight_rejected() {
        let cfg = SimilarityConfig::new().with_bigram_weight(-0.2);
        assert!(matches!(
            cfg.validate(),
            Err(SimilarityError::InvalidWeight {
                name: "bigram_weight",
                ..
            })
        ));
        let cfg = SimilarityConfig::new().with_edit_weight(f64::NAN);
        assert!(matches!(
            cfg.validate(),
            Err(SimilarityError::InvalidWeight {
                name: "edit_weight",
                ..
            })
        ));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let cfg = SimilarityConfig::new().with_edit_weight(0.6);
        assert!(matches!(cfg.validate(), Err(SimilarityError::WeightSum { .. })));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SimilarityConfig =
            serde_json::from_str(r#"{"edit_weight": 0.5, "bigram_weight": 0.1}"#).unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.edit_weight, 0.5);
        assert_eq!(cfg.token_weight, 0.4);
        assert_eq!(cfg.bigram_weight, 0.1);
        assert!(cfg.validate().is_ok());

        let json = serde_json::to_string(&cfg).unwrap();
        let back: SimilarityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = SimilarityConfig {
            version: 0,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(SimilarityError::InvalidConfigVersion { version: 0 })
        );
    }
}
