//! geolink canonical text layer.
//!
//! Turns free-text addresses into a deterministic canonical form so that the
//! similarity scorer compares content, not formatting.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC by default, configurable)
//! - Locale-free lowercasing
//! - Everything except letters and digits becomes a delimiter
//! - Whitespace collapses to single spaces, no leading/trailing space
//! - Cyrillic is transliterated to Latin (configurable)
//! - Address noise tokens (`ul`, `d`, `korp`, `st`, `bldg`, ...) are dropped
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence. Output depends only on
//! text + config, and normalization is idempotent:
//! `normalize(normalize(x)) == normalize(x)`.
//!
//! ```rust
//! use canonical::{NormalizerConfig, TextNormalizer};
//!
//! let normalizer = TextNormalizer::new(NormalizerConfig::default()).unwrap();
//! assert_eq!(normalizer.normalize("ул. Ленина, 10"), "lenina 10");
//! assert_eq!(normalizer.normalize("Lenina 10"), "lenina 10");
//! ```

mod config;
mod error;
mod pipeline;
mod stop_tokens;
mod token;
mod transliterate;

pub use crate::config::NormalizerConfig;
pub use crate::error::CanonicalError;
pub use crate::pipeline::{normalize, TextNormalizer};
pub use crate::stop_tokens::DEFAULT_STOP_TOKENS;
pub use crate::token::Token;
pub use crate::transliterate::transliterate;
