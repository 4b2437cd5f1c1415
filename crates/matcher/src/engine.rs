use std::cmp::Ordering;
use std::time::Instant;

use geometry::distance;
use ingest::{validate_incoming, IncomingRecord};
use tracing::{debug, warn, Level};

use crate::context::LinkageContext;
use crate::types::{ConfidenceTier, MatchError, MatchMethod, MatchResult};

#[cfg(test)]
mod tests;

/// A registry record considered by one stage, already scored.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    id: &'a str,
    distance_m: f64,
    text_similarity: f64,
    composite: f64,
}

/// Composite desc, text similarity desc, distance asc, id asc.
fn rank(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.composite
        .total_cmp(&a.composite)
        .then_with(|| b.text_similarity.total_cmp(&a.text_similarity))
        .then_with(|| a.distance_m.total_cmp(&b.distance_m))
        .then_with(|| a.id.cmp(b.id))
}

impl LinkageContext {
    /// Resolve one incoming record. See [`resolve`].
    pub fn resolve(&self, incoming: &IncomingRecord) -> Result<MatchResult, MatchError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::DEBUG,
            "matcher.resolve",
            external_id = %incoming.external_id
        );
        let _guard = span.enter();

        let outcome = self.resolve_inner(incoming);
        let elapsed = start.elapsed();
        match &outcome {
            Ok(result) => debug!(
                method = result.method.as_str(),
                tier = result.confidence_tier.as_str(),
                matched_address_id = ?result.matched_address_id,
                composite_score = result.composite_score,
                elapsed_micros = elapsed.as_micros(),
                "resolve_complete"
            ),
            Err(err) => warn!(
                error = %err,
                elapsed_micros = elapsed.as_micros(),
                "resolve_failure"
            ),
        }
        if let Some(metrics) = self.metrics() {
            metrics.record_resolve(elapsed, outcome.as_ref());
        }
        outcome
    }

    fn resolve_inner(&self, incoming: &IncomingRecord) -> Result<MatchResult, MatchError> {
        validate_incoming(incoming)?;
        let cfg = self.resolver_config();
        let query_text = self.normalizer().normalize(&incoming.raw_text);
        let center = incoming.coordinate;

        // Stage 1: a single record inside the exact radius wins outright.
        // Several candidates fall through so text can break the tie.
        let exact = self.candidates_within(&query_text, incoming, cfg.exact_radius_m);
        if let [only] = exact.as_slice() {
            return Ok(self.promote(only, MatchMethod::ExactGeo, ConfidenceTier::High, Some(1.0)));
        }

        // Stage 2.
        let near = self.candidates_within(&query_text, incoming, cfg.near_radius_m);
        if let Some(best) = near.first() {
            if best.text_similarity >= cfg.near_text_threshold {
                return Ok(self.promote(best, MatchMethod::NearGeoText, ConfidenceTier::High, None));
            }
        }

        // Stage 3.
        let extended = self.candidates_within(&query_text, incoming, cfg.extended_radius_m);
        if let Some(best) = extended.first() {
            if best.text_similarity >= cfg.extended_text_threshold {
                let tier = if best.text_similarity >= cfg.high_tier_threshold {
                    ConfidenceTier::High
                } else {
                    ConfidenceTier::Medium
                };
                return Ok(self.promote(best, MatchMethod::ExtendedGeoText, tier, None));
            }
        }

        // Stage 4: the whole registry, text decides.
        let mut global: Vec<Candidate<'_>> = self
            .registry()
            .iter()
            .enumerate()
            .map(|(slot, record)| {
                self.score(&query_text, slot, &record.id, distance(center, record.coordinate))
            })
            .collect();
        global.sort_by(rank);
        if let Some(best) = global.first() {
            if best.text_similarity >= cfg.global_text_threshold {
                return Ok(self.promote(best, MatchMethod::GlobalText, ConfidenceTier::VeryLow, None));
            }
        }

        Ok(MatchResult::no_match())
    }

    /// Scored candidates inside `radius_m`, best first.
    fn candidates_within<'a>(
        &'a self,
        query_text: &str,
        incoming: &IncomingRecord,
        radius_m: f64,
    ) -> Vec<Candidate<'a>> {
        let mut candidates: Vec<Candidate<'a>> = self
            .index()
            .neighbors_within(incoming.coordinate, radius_m)
            .into_iter()
            .filter_map(|neighbor| {
                let slot = self.registry().index_of(neighbor.key)?;
                Some(self.score(query_text, slot, neighbor.key, neighbor.distance_m))
            })
            .collect();
        candidates.sort_by(rank);
        candidates
    }

    fn score<'a>(&self, query_text: &str, slot: usize, id: &'a str, distance_m: f64) -> Candidate<'a> {
        let text_similarity = self.scorer().score(query_text, self.normalized_text(slot));
        Candidate {
            id,
            distance_m,
            text_similarity,
            composite: self.resolver_config().composite_score(text_similarity, distance_m),
        }
    }

    fn promote(
        &self,
        candidate: &Candidate<'_>,
        method: MatchMethod,
        tier: ConfidenceTier,
        composite_override: Option<f64>,
    ) -> MatchResult {
        MatchResult {
            matched_address_id: Some(candidate.id.to_string()),
            confidence_tier: tier,
            method,
            distance_meters: candidate.distance_m,
            text_similarity: candidate.text_similarity,
            composite_score: composite_override.unwrap_or(candidate.composite),
        }
    }
}

/// Resolve `incoming` against the registry held by `ctx`.
///
/// Runs four stages in order and stops at the first that promotes a
/// candidate:
///
/// | Stage | Radius | Promotion | Method | Tier |
/// |---|---|---|---|---|
/// | 1 | 30 m | exactly one candidate | `exact_geo` | high, composite 1.0 |
/// | 2 | 100 m | best text similarity >= 0.85 | `near_geo_text` | high |
/// | 3 | 300 m | best text similarity >= 0.65 | `extended_geo_text` | high if >= 0.85, else medium |
/// | 4 | unbounded | best text similarity >= 0.40 | `global_text` | very_low |
///
/// Radii and thresholds are the [`ResolverConfig`](crate::ResolverConfig)
/// defaults. "Best" is the top candidate by composite score, then text
/// similarity, then distance, then id, so the result never depends on index
/// iteration order.
///
/// A record with an empty id, an invalid coordinate or blank text yields
/// `Err`; the caller decides whether that aborts anything.
pub fn resolve(incoming: &IncomingRecord, ctx: &LinkageContext) -> Result<MatchResult, MatchError> {
    ctx.resolve(incoming)
}
