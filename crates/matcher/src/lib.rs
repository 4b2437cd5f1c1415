//! # geolink Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` resolves one loosely geocoded, free-text record against the
//! address registry. It combines spatial candidates from `spatial`, text
//! canonicalization from `canonical` and scores from `similarity` into a
//! single ranked [`MatchResult`] with a confidence tier.
//!
//! ## Core Types
//!
//! - [`LinkageContext`]: registry snapshot + spatial index + validated
//!   configuration. Built once per registry version, then shared read-only.
//! - [`LinkageConfig`]: normalizer, similarity and [`ResolverConfig`] knobs.
//! - [`MatchResult`]: matched id (if any), [`ConfidenceTier`],
//!   [`MatchMethod`], distance, text similarity and composite score.
//! - [`resolve`]: the staged state machine (exact geo, near geo + text,
//!   extended geo + text, global text, no match).
//!
//! ## Example Usage
//!
//! ```
//! use geometry::Coordinate;
//! use ingest::{AddressRecord, AddressRegistry, IncomingRecord};
//! use matcher::{resolve, ConfidenceTier, LinkageConfig, LinkageContext, MatchMethod};
//!
//! let registry = AddressRegistry::from_records(vec![AddressRecord {
//!     id: "a-1".into(),
//!     canonical_text: "Lenina 10".into(),
//!     coordinate: Coordinate::new(55.0, 82.9).unwrap(),
//! }])
//! .unwrap();
//! let ctx = LinkageContext::new(registry, LinkageConfig::default()).unwrap();
//!
//! let listing = IncomingRecord {
//!     external_id: "ext-1".into(),
//!     raw_text: "ул. Ленина, 10".into(),
//!     coordinate: Coordinate::new(55.0001, 82.9001).unwrap(),
//! };
//! let result = resolve(&listing, &ctx).unwrap();
//! assert_eq!(result.matched_address_id.as_deref(), Some("a-1"));
//! assert_eq!(result.method, MatchMethod::ExactGeo);
//! assert_eq!(result.confidence_tier, ConfidenceTier::High);
//! ```
//!
//! ## Observability
//!
//! Every call emits a `matcher.resolve` tracing span with a
//! `resolve_complete` or `resolve_failure` event. Install a
//! [`ResolveMetrics`] observer with [`LinkageContext::with_metrics`] to
//! record per-call latency and outcome.

mod config;
mod context;
mod engine;
mod types;

pub use crate::config::{LinkageConfig, ResolverConfig};
pub use crate::context::{LinkageContext, ResolveMetrics};
pub use crate::engine::resolve;
pub use crate::types::{ConfidenceTier, MatchError, MatchMethod, MatchResult};
