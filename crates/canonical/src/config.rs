//! Configuration for the address text normalizer.
//!
//! # Versioning
//!
//! `version` tracks the behaviour of the pipeline. Any change that alters
//! normalized output for some input (a new stop token, a transliteration fix)
//! is a version bump, so linkage runs stay reproducible against stored
//! results.
//!
//! # Examples
//!
//! ```rust
//! use canonical::NormalizerConfig;
//!
//! let config = NormalizerConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.normalize_unicode);
//! assert!(config.transliterate_cyrillic);
//! assert!(config.default_stop_tokens);
//! ```
//!
//! Adding local noise words on top of the built-in list:
//!
//! ```rust
//! use canonical::NormalizerConfig;
//!
//! let config = NormalizerConfig {
//!     extra_stop_tokens: vec!["mkr".into(), "microdistrict".into()],
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for [`TextNormalizer`](crate::TextNormalizer).
///
/// Serialized form (every field optional, defaults shown):
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": true,
///   "lowercase": true,
///   "transliterate_cyrillic": true,
///   "default_stop_tokens": true,
///   "extra_stop_tokens": []
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Behaviour version. Must be >= 1; 0 is reserved.
    pub version: u32,

    /// Apply Unicode NFKC normalization before any other transform, so that
    /// composed and decomposed spellings (and full-width digits) agree.
    pub normalize_unicode: bool,

    /// Apply locale-free Unicode lowercasing.
    pub lowercase: bool,

    /// Map Cyrillic letters to their Latin transliteration, so that
    /// `"Ленина"` and `"Lenina"` compare equal.
    ///
    /// Transliteration works on lowercase letters; with `lowercase` disabled
    /// uppercase Cyrillic passes through unchanged.
    pub transliterate_cyrillic: bool,

    /// Remove the built-in street/building/block/entrance abbreviations.
    pub default_stop_tokens: bool,

    /// Additional noise tokens to remove. Each entry is matched against
    /// normalized tokens, so it is normalized with the same settings before
    /// use.
    pub extra_stop_tokens: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            lowercase: true,
            transliterate_cyrillic: true,
            default_stop_tokens: true,
            extra_stop_tokens: Vec::new(),
        }
    }
}

impl NormalizerConfig {
    /// Reject configurations the pipeline cannot honour.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if let Some(blank) = self
            .extra_stop_tokens
            .iter()
            .position(|token| token.trim().is_empty())
        {
            return Err(CanonicalError::InvalidConfig(format!(
                "extra_stop_tokens[{blank}] is blank"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: NormalizerConfig =
            serde_json::from_str(r#"{"transliterate_cyrillic": false}"#).unwrap();
        assert!(!cfg.transliterate_cyrillic);
        assert_eq!(cfg.version, 1);
        assert!(cfg.default_stop_tokens);
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = NormalizerConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CanonicalError::InvalidConfig(_))));
    }

    #[test]
    fn blank_extra_stop_token_rejected() {
        let cfg = NormalizerConfig {
            extra_stop_tokens: vec!["mkr".into(), "  ".into()],
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err,
            CanonicalError::InvalidConfig("extra_stop_tokens[1] is blank".into())
        );
    }
}
