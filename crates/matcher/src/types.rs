use canonical::CanonicalError;
use ingest::IngestError;
use serde::{Deserialize, Serialize};
use similarity::SimilarityError;
use spatial::IndexError;
use thiserror::Error;

/// Reliability bucket reported with every match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    VeryLow,
    None,
}

impl ConfidenceTier {
    pub const ALL: [ConfidenceTier; 5] = [
        ConfidenceTier::High,
        ConfidenceTier::Medium,
        ConfidenceTier::Low,
        ConfidenceTier::VeryLow,
        ConfidenceTier::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
            ConfidenceTier::VeryLow => "very_low",
            ConfidenceTier::None => "none",
        }
    }
}

/// Resolver stage that produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactGeo,
    NearGeoText,
    ExtendedGeoText,
    GlobalText,
    NoMatch,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 5] = [
        MatchMethod::ExactGeo,
        MatchMethod::NearGeoText,
        MatchMethod::ExtendedGeoText,
        MatchMethod::GlobalText,
        MatchMethod::NoMatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMethod::ExactGeo => "exact_geo",
            MatchMethod::NearGeoText => "near_geo_text",
            MatchMethod::ExtendedGeoText => "extended_geo_text",
            MatchMethod::GlobalText => "global_text",
            MatchMethod::NoMatch => "no_match",
        }
    }
}

/// Outcome of resolving one incoming record. A pure value; nothing here is
/// persisted.
///
/// `text_similarity` and `composite_score` are always in `[0, 1]`;
/// `distance_meters` is non-negative. A `no_match` result reports zeros.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub matched_address_id: Option<String>,
    pub confidence_tier: ConfidenceTier,
    pub method: MatchMethod,
    pub distance_meters: f64,
    pub text_similarity: f64,
    pub composite_score: f64,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            matched_address_id: None,
            confidence_tier: ConfidenceTier::None,
            method: MatchMethod::NoMatch,
            distance_meters: 0.0,
            text_similarity: 0.0,
            composite_score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched_address_id.is_some()
    }
}

/// Errors surfaced by the matcher.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// Invalid resolver configuration.
    #[error("invalid resolver config: {0}")]
    InvalidConfig(String),
    /// The incoming record failed validation.
    #[error("invalid record: {0}")]
    Ingest(#[from] IngestError),
    /// Normalizer configuration rejected.
    #[error("canonical error: {0}")]
    Canonical(#[from] CanonicalError),
    /// Similarity configuration rejected.
    #[error("similarity error: {0}")]
    Similarity(#[from] SimilarityError),
    /// Spatial index construction failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

impl MatchError {
    /// True when only the record being resolved is affected.
    pub fn is_per_record(&self) -> bool {
        matches!(self, MatchError::Ingest(err) if err.is_per_record())
    }
}
