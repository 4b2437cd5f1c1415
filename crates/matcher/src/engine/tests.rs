use super::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use geometry::{destination, Coordinate};
use ingest::{AddressRecord, AddressRegistry};

use crate::config::LinkageConfig;
use crate::context::ResolveMetrics;

const ORIGIN: Coordinate = Coordinate::new_unchecked(55.0, 82.9);

fn address(id: &str, text: &str, coordinate: Coordinate) -> AddressRecord {
    AddressRecord {
        id: id.into(),
        canonical_text: text.into(),
        coordinate,
    }
}

fn incoming(text: &str, coordinate: Coordinate) -> IncomingRecord {
    IncomingRecord {
        external_id: "ext-1".into(),
        raw_text: text.into(),
        coordinate,
    }
}

fn context(records: Vec<AddressRecord>) -> LinkageContext {
    let registry = AddressRegistry::from_records(records).expect("valid registry");
    LinkageContext::new(registry, LinkageConfig::default()).expect("valid context")
}

/// A point `meters` due north of [`ORIGIN`].
fn north(meters: f64) -> Coordinate {
    destination(ORIGIN, 0.0, meters)
}

#[test]
fn exact_match_at_zero_distance() {
    let ctx = context(vec![address("1", "Lenina 10", ORIGIN)]);
    let result = resolve(&incoming("Lenina 10", ORIGIN), &ctx).unwrap();

    assert_eq!(result.matched_address_id.as_deref(), Some("1"));
    assert_eq!(result.method, MatchMethod::ExactGeo);
    assert_eq!(result.confidence_tier, ConfidenceTier::High);
    assert_eq!(result.composite_score, 1.0);
    assert_eq!(result.distance_meters, 0.0);
    assert_eq!(result.text_similarity, 1.0);
}

#[test]
fn cyrillic_listing_matches_latin_registry_entry() {
    let ctx = context(vec![address("1", "Lenina 10", ORIGIN)]);
    let at = Coordinate::new(55.0001, 82.9001).unwrap();
    let result = resolve(&incoming("ул. Ленина, 10", at), &ctx).unwrap();

    assert_eq!(result.matched_address_id.as_deref(), Some("1"));
    assert!(matches!(
        result.method,
        MatchMethod::ExactGeo | MatchMethod::NearGeoText
    ));
    assert_eq!(result.confidence_tier, ConfidenceTier::High);
    assert!(result.text_similarity >= 0.85);
    assert!(result.distance_meters > 10.0 && result.distance_meters < 15.0);
}

#[test]
fn several_exact_candidates_fall_through_to_text() {
    // Both records are ~11 m from the listing; stage 1 must not pick one.
    let ctx = context(vec![
        address("a-12", "ул. Ленина, 12", north(22.0)),
        address("a-10", "ул. Ленина, 10", ORIGIN),
    ]);
    let result = resolve(&incoming("Lenina 10", north(11.0)), &ctx).unwrap();

    assert_eq!(result.method, MatchMethod::NearGeoText);
    assert_eq!(result.confidence_tier, ConfidenceTier::High);
    assert_eq!(result.matched_address_id.as_deref(), Some("a-10"));
    assert_eq!(result.text_similarity, 1.0);
}

#[test]
fn degradation_escalates_method_and_lowers_score() {
    // "lenina 10 10" vs "lenina 10": similarity stays fixed near 0.88.
    let text = "Lenina 10, 10";
    let expected = [
        (20.0, MatchMethod::ExactGeo),
        (60.0, MatchMethod::NearGeoText),
        (150.0, MatchMethod::ExtendedGeoText),
        (400.0, MatchMethod::GlobalText),
    ];

    let mut previous_score = f64::INFINITY;
    let mut similarities = Vec::new();
    for (meters, method) in expected {
        let ctx = context(vec![address("1", "Lenina 10", north(meters))]);
        let result = resolve(&incoming(text, ORIGIN), &ctx).unwrap();

        assert_eq!(result.method, method, "at {meters} m");
        assert_eq!(result.matched_address_id.as_deref(), Some("1"));
        assert!(
            result.composite_score < previous_score,
            "score {} at {meters} m not below {previous_score}",
            result.composite_score
        );
        assert!((result.distance_meters - meters).abs() < 0.01);
        previous_score = result.composite_score;
        similarities.push(result.text_similarity);
    }

    assert!(similarities.iter().all(|&s| s == similarities[0]));
    assert!(similarities[0] >= 0.85 && similarities[0] < 1.0);
}

#[test]
fn extended_stage_assigns_medium_below_high_threshold() {
    // "lenina 10a" vs "lenina 10" scores about 0.67.
    let ctx = context(vec![address("1", "Lenina 10", north(150.0))]);
    let result = resolve(&incoming("Lenina 10a", ORIGIN), &ctx).unwrap();

    assert_eq!(result.method, MatchMethod::ExtendedGeoText);
    assert_eq!(result.confidence_tier, ConfidenceTier::Medium);
    assert!(result.text_similarity >= 0.65 && result.text_similarity < 0.85);
}

#[test]
fn near_stage_rejects_weak_text_then_extended_accepts() {
    // Inside 100 m but below 0.85: stage 2 declines, stage 3 promotes.
    let ctx = context(vec![address("1", "Lenina 10", north(60.0))]);
    let result = resolve(&incoming("Lenina 10a", ORIGIN), &ctx).unwrap();
    assert_eq!(result.method, MatchMethod::ExtendedGeoText);
    assert_eq!(result.confidence_tier, ConfidenceTier::Medium);
}

#[test]
fn global_stage_reaches_distant_records() {
    let ctx = context(vec![address("1", "Lenina 10", north(5_000.0))]);
    let result = resolve(&incoming("Lenina 10", ORIGIN), &ctx).unwrap();
    assert_eq!(result.method, MatchMethod::GlobalText);
    assert_eq!(result.confidence_tier, ConfidenceTier::VeryLow);
    assert!((result.composite_score - 0.6).abs() < 1e-9);
}

#[test]
fn unrelated_text_far_away_is_no_match() {
    let ctx = context(vec![address("1", "Lenina 10", ORIGIN)]);
    let far = north(10_000.0);
    let result = resolve(&incoming("Sovetskaya 64", far), &ctx).unwrap();

    assert_eq!(result, MatchResult::no_match());
    assert!(result.matched_address_id.is_none());
}

#[test]
fn empty_registry_is_no_match() {
    let ctx = context(Vec::new());
    let result = resolve(&incoming("Lenina 10", ORIGIN), &ctx).unwrap();
    assert_eq!(result.method, MatchMethod::NoMatch);
}

#[test]
fn equal_candidates_break_ties_by_id() {
    let at = north(60.0);
    let ctx = context(vec![
        address("b", "Lenina 10", at),
        address("a", "Lenina 10", at),
    ]);
    let result = resolve(&incoming("Lenina 10", ORIGIN), &ctx).unwrap();
    assert_eq!(result.method, MatchMethod::NearGeoText);
    assert_eq!(result.matched_address_id.as_deref(), Some("a"));
}

#[test]
fn text_of_only_noise_tokens_still_matches_geographically() {
    let ctx = context(vec![address("1", "Lenina 10", ORIGIN)]);
    let result = resolve(&incoming("ул., д.", north(5.0)), &ctx).unwrap();
    assert_eq!(result.method, MatchMethod::ExactGeo);
    assert_eq!(result.text_similarity, 0.0);
    assert_eq!(result.composite_score, 1.0);
}

#[test]
fn invalid_records_are_errors() {
    let ctx = context(vec![address("1", "Lenina 10", ORIGIN)]);

    let nan = incoming("Lenina 10", Coordinate::new_unchecked(f64::NAN, 82.9));
    let err = resolve(&nan, &ctx).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Ingest(ingest::IngestError::InvalidCoordinate { .. })
    ));
    assert!(err.is_per_record());

    let blank = incoming("   ", ORIGIN);
    assert!(matches!(
        resolve(&blank, &ctx),
        Err(MatchError::Ingest(ingest::IngestError::EmptyText { .. }))
    ));
}

#[test]
fn scores_stay_in_unit_interval() {
    let ctx = context(vec![
        address("1", "Lenina 10", ORIGIN),
        address("2", "Marksa 7", north(80.0)),
        address("3", "Sovetskaya 64", north(250.0)),
    ]);
    for text in ["Lenina 10", "Marksa", "Sovetskaya 6", "zzz", "ул. Ленина"] {
        for meters in [0.0, 40.0, 120.0, 2_000.0] {
            let result = resolve(&incoming(text, north(meters)), &ctx).unwrap();
            assert!((0.0..=1.0).contains(&result.composite_score));
            assert!((0.0..=1.0).contains(&result.text_similarity));
            assert!(result.distance_meters >= 0.0);
        }
    }
}

#[derive(Default)]
struct RecordingMetrics {
    events: Mutex<Vec<&'static str>>,
}

impl ResolveMetrics for RecordingMetrics {
    fn record_resolve(&self, _latency: Duration, outcome: Result<&MatchResult, &MatchError>) {
        let label = match outcome {
            Ok(result) => result.method.as_str(),
            Err(_) => "error",
        };
        self.events.lock().unwrap().push(label);
    }
}

#[test]
fn metrics_observer_sees_every_call() {
    let metrics = Arc::new(RecordingMetrics::default());
    let ctx = context(vec![address("1", "Lenina 10", ORIGIN)]).with_metrics(metrics.clone());

    ctx.resolve(&incoming("Lenina 10", ORIGIN)).unwrap();
    ctx.resolve(&incoming("", ORIGIN)).unwrap_err();

    assert_eq!(*metrics.events.lock().unwrap(), vec!["exact_geo", "error"]);
}

#[test]
fn context_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LinkageContext>();
}
