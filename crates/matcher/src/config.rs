use canonical::NormalizerConfig;
use serde::{Deserialize, Serialize};
use similarity::SimilarityConfig;

use crate::types::MatchError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Stage radii, promotion thresholds and composite-score weights.
///
/// Every stage ranks its candidates with the same composite score:
///
/// ```text
/// composite = text_weight * text_similarity
///           + distance_weight * (1 - min(distance / distance_norm_m, 1))
/// ```
///
/// and stages differ only in search radius and promotion threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Stage 1 radius. Exactly one candidate inside promotes to `exact_geo`.
    pub exact_radius_m: f64,
    /// Stage 2 radius.
    pub near_radius_m: f64,
    /// Stage 3 radius. Stage 4 is unbounded.
    pub extended_radius_m: f64,
    /// Minimum text similarity to promote from stage 2.
    pub near_text_threshold: f64,
    /// Minimum text similarity to promote from stage 3.
    pub extended_text_threshold: f64,
    /// Minimum text similarity to promote from stage 4.
    pub global_text_threshold: f64,
    /// Stage 3 matches at or above this similarity are `high`, else `medium`.
    pub high_tier_threshold: f64,
    pub text_weight: f64,
    pub distance_weight: f64,
    /// Distance at which the distance term of the composite reaches zero.
    pub distance_norm_m: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exact_radius_m: 30.0,
            near_radius_m: 100.0,
            extended_radius_m: 300.0,
            near_text_threshold: 0.85,
            extended_text_threshold: 0.65,
            global_text_threshold: 0.40,
            high_tier_threshold: 0.85,
            text_weight: 0.6,
            distance_weight: 0.4,
            distance_norm_m: 300.0,
        }
    }
}

impl ResolverConfig {
    /// Validate the configuration before building a context.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version == 0 {
            return Err(MatchError::InvalidConfig(
                "version must be >= 1".into(),
            ));
        }

        let radii = [
            ("exact_radius_m", self.exact_radius_m),
            ("near_radius_m", self.near_radius_m),
            ("extended_radius_m", self.extended_radius_m),
            ("distance_norm_m", self.distance_norm_m),
        ];
        for (name, value) in radii {
            if !value.is_finite() || value <= 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be a positive number of meters (got {value})"
                )));
            }
        }
        if self.exact_radius_m > self.near_radius_m || self.near_radius_m > self.extended_radius_m {
            return Err(MatchError::InvalidConfig(
                "stage radii must satisfy exact <= near <= extended".into(),
            ));
        }

        let fractions = [
            ("near_text_threshold", self.near_text_threshold),
            ("extended_text_threshold", self.extended_text_threshold),
            ("global_text_threshold", self.global_text_threshold),
            ("high_tier_threshold", self.high_tier_threshold),
            ("text_weight", self.text_weight),
            ("distance_weight", self.distance_weight),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0 (got {value})"
                )));
            }
        }

        let sum = self.text_weight + self.distance_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchError::InvalidConfig(format!(
                "text_weight + distance_weight must equal 1.0 (got {sum})"
            )));
        }
        Ok(())
    }

    /// Composite ranking score in `[0, 1]`.
    pub fn composite_score(&self, text_similarity: f64, distance_m: f64) -> f64 {
        let proximity = 1.0 - (distance_m / self.distance_norm_m).min(1.0);
        (self.text_weight * text_similarity + self.distance_weight * proximity).clamp(0.0, 1.0)
    }
}

/// Every knob a [`LinkageContext`](crate::LinkageContext) needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkageConfig {
    pub normalizer: NormalizerConfig,
    pub similarity: SimilarityConfig,
    pub resolver: ResolverConfig,
}

impl LinkageConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        self.normalizer.validate()?;
        self.similarity.validate()?;
        self.resolver.validate()
    }
}
