//! # geolink Similarity Scorer
//!
//! Composite string similarity for canonical address text. Three independent
//! measures are combined with configurable weights (defaults in parentheses):
//!
//! - **edit** (0.4): `1 - levenshtein(a, b) / max(len(a), len(b))`
//! - **tokens** (0.4): Jaccard index over whitespace-separated words
//! - **bigrams** (0.2): Jaccard index over character bigrams
//!
//! ## Contract
//!
//! - Inputs are expected to be canonical text from the `canonical` crate; no
//!   normalization happens here.
//! - Every score is symmetric, lies in `[0, 1]` and is `0` whenever either
//!   input is empty.
//! - Scores are a pure function of `(a, b, config)`.
//!
//! ```
//! use similarity::{SimilarityConfig, SimilarityScorer};
//!
//! let scorer = SimilarityScorer::new(SimilarityConfig::default()).unwrap();
//! assert_eq!(scorer.score("lenina 10", "lenina 10"), 1.0);
//! assert_eq!(scorer.score("lenina 10", ""), 0.0);
//! assert!(scorer.score("lenina 10", "lenina 12") > scorer.score("lenina 10", "marksa 7"));
//! ```

mod config;
mod measures;

use serde::{Deserialize, Serialize};

pub use crate::config::{SimilarityConfig, SimilarityError};
pub use crate::measures::{edit_similarity, jaccard_bigrams, jaccard_tokens};

/// Per-measure scores behind one composite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
    pub edit: f64,
    pub tokens: f64,
    pub bigrams: f64,
    pub composite: f64,
}

/// Weighted composite scorer with a validated configuration.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    config: SimilarityConfig,
}

impl SimilarityScorer {
    pub fn new(config: SimilarityConfig) -> Result<Self, SimilarityError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Composite text similarity in `[0, 1]`.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.breakdown(a, b).composite
    }

    pub fn breakdown(&self, a: &str, b: &str) -> SimilarityBreakdown {
        let edit = edit_similarity(a, b);
        let tokens = jaccard_tokens(a, b);
        let bigrams = jaccard_bigrams(a, b);
        let composite = self.config.edit_weight * edit
            + self.config.token_weight * tokens
            + self.config.bigram_weight * bigrams;
        SimilarityBreakdown {
            edit,
            tokens,
            bigrams,
            composite: composite.clamp(0.0, 1.0),
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self {
            config: SimilarityConfig::default(),
        }
    }
}

/// Composite similarity with the default weights (0.4 / 0.4 / 0.2).
pub fn composite_text_similarity(a: &str, b: &str) -> f64 {
    SimilarityScorer::default().score(a, b)
}
