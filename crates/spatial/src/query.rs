use std::cmp::Ordering;

use geometry::{distance, point_in_polygon, BoundingBox, Coordinate, Polygon, EARTH_RADIUS_M};
use rstar::AABB;

use crate::{IndexEntry, SpatialIndex};

/// Padding added to every prefilter envelope, in degrees.
const ENVELOPE_PAD_DEG: f64 = 1e-9;

/// Half of the equatorial circumference; no two points are farther apart.
const MAX_DISTANCE_M: f64 = std::f64::consts::PI * EARTH_RADIUS_M;

/// Result entry for radius and nearest-neighbour queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a, K> {
    pub key: &'a K,
    pub coordinate: Coordinate,
    /// Haversine distance from the query centre, in meters.
    pub distance_m: f64,
}

/// Provides polygon, box, radius and nearest-neighbour retrieval.
impl<K> SpatialIndex<K> {
    fn slots_in(&self, lower: [f64; 2], upper: [f64; 2]) -> Vec<usize> {
        let envelope = AABB::from_corners(lower, upper);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|point| point.data)
            .collect()
    }

    /// Entries whose coordinate lies inside `bbox` (edges inclusive).
    pub fn query_bbox(&self, bbox: &BoundingBox) -> Vec<&IndexEntry<K>> {
        let mut slots = self.slots_in(bbox.lower_xy(), bbox.upper_xy());
        slots.sort_unstable();
        slots.into_iter().map(|slot| self.entry(slot)).collect()
    }

    /// Keys of every entry inside `polygon`, boundary included, in build
    /// order.
    pub fn query_polygon(&self, polygon: &Polygon) -> Vec<K>
    where
        K: Clone,
    {
        let bbox = polygon.bounding_box();
        let lower = [bbox.min_lng - ENVELOPE_PAD_DEG, bbox.min_lat - ENVELOPE_PAD_DEG];
        let upper = [bbox.max_lng + ENVELOPE_PAD_DEG, bbox.max_lat + ENVELOPE_PAD_DEG];

        let mut slots: Vec<usize> = self
            .slots_in(lower, upper)
            .into_iter()
            .filter(|&slot| point_in_polygon(self.entry(slot).coordinate, polygon))
            .collect();
        slots.sort_unstable();
        slots
            .into_iter()
            .map(|slot| self.entry(slot).key.clone())
            .collect()
    }

    /// Entries within `radius_m` of `center`, closest first. Ties keep build
    /// order. An invalid centre or a negative/NaN radius yields no entries.
    pub fn neighbors_within(&self, center: Coordinate, radius_m: f64) -> Vec<Neighbor<'_, K>> {
        if !center.is_valid() || radius_m.is_nan() || radius_m < 0.0 {
            return Vec::new();
        }

        let (lower, upper) = radius_envelope(center, radius_m);
        let mut hits: Vec<(usize, f64)> = self
            .slots_in(lower, upper)
            .into_iter()
            .filter_map(|slot| {
                let d = distance(center, self.entry(slot).coordinate);
                (d <= radius_m).then_some((slot, d))
            })
            .collect();

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        hits.into_iter()
            .map(|(slot, distance_m)| {
                let entry = self.entry(slot);
                Neighbor {
                    key: &entry.key,
                    coordinate: entry.coordinate,
                    distance_m,
                }
            })
            .collect()
    }

    /// Keys within `radius_m` of `center`, closest first.
    pub fn query_radius(&self, center: Coordinate, radius_m: f64) -> Vec<K>
    where
        K: Clone,
    {
        self.neighbors_within(center, radius_m)
            .into_iter()
            .map(|n| n.key.clone())
            .collect()
    }

    /// The `k` entries closest to `center` by haversine distance.
    ///
    /// Searches with a doubling radius, so the result is exact: once at least
    /// `k` entries fall within radius `r`, nothing outside `r` can be closer.
    pub fn nearest(&self, center: Coordinate, k: usize) -> Vec<Neighbor<'_, K>> {
        if k == 0 || self.is_empty() || !center.is_valid() {
            return Vec::new();
        }

        let mut radius = 100.0;
        loop {
            let mut hits = self.neighbors_within(center, radius);
            if hits.len() >= k || radius >= MAX_DISTANCE_M {
                hits.truncate(k);
                return hits;
            }
            radius = (radius * 2.0).min(MAX_DISTANCE_M);
        }
    }
}

/// Prefilter envelope for a spherical cap of `radius_m` around `center`, in
/// `[lng, lat]` order.
///
/// The longitude half-width is the exact extent of the cap,
/// `asin(sin(d) / cos(lat))`. Caps that reach a pole or cross the
/// antimeridian get the full longitude band; the exact distance check
/// removes the extra candidates.
fn radius_envelope(center: Coordinate, radius_m: f64) -> ([f64; 2], [f64; 2]) {
    let angular = radius_m / EARTH_RADIUS_M;
    let d_lat = angular.to_degrees();
    let min_lat = center.lat - d_lat;
    let max_lat = center.lat + d_lat;

    let cos_lat = center.lat.to_radians().cos();
    let sin_d = angular.min(std::f64::consts::FRAC_PI_2).sin();

    let full_band = min_lat <= -90.0 || max_lat >= 90.0 || sin_d >= cos_lat;
    let (min_lng, max_lng) = if full_band {
        (-180.0, 180.0)
    } else {
        let d_lng = (sin_d / cos_lat).asin().to_degrees();
        let (lo, hi) = (center.lng - d_lng, center.lng + d_lng);
        if lo < -180.0 || hi > 180.0 {
            (-180.0, 180.0)
        } else {
            (lo, hi)
        }
    };

    (
        [min_lng - ENVELOPE_PAD_DEG, min_lat.max(-90.0) - ENVELOPE_PAD_DEG],
        [max_lng + ENVELOPE_PAD_DEG, max_lat.min(90.0) + ENVELOPE_PAD_DEG],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::{buffer, destination};

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new_unchecked(lat, lng)
    }

    fn scattered(n: usize, seed: u64) -> Vec<(usize, Coordinate)> {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..n)
            .map(|i| (i, c(54.9 + rng.f64() * 0.2, 82.8 + rng.f64() * 0.2)))
            .collect()
    }

    fn index_of(records: &[(usize, Coordinate)]) -> SpatialIndex<usize> {
        SpatialIndex::build(records, |(id, at)| (*id, *at)).unwrap()
    }

    #[test]
    fn radius_query_matches_brute_force() {
        let records = scattered(2_000, 7);
        let index = index_of(&records);
        let center = c(55.0, 82.9);

        for radius in [30.0, 100.0, 300.0, 1_500.0, 5_000.0] {
            let mut got = index.query_radius(center, radius);
            got.sort_unstable();
            let expected: Vec<usize> = records
                .iter()
                .filter(|(_, at)| distance(center, *at) <= radius)
                .map(|(id, _)| *id)
                .collect();
            assert_eq!(got, expected, "radius {radius}");
        }
    }

    #[test]
    fn neighbors_are_sorted_by_distance() {
        let records = scattered(500, 11);
        let index = index_of(&records);
        let hits = index.neighbors_within(c(55.0, 82.9), 3_000.0);
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].distance_m <= pair[1].distance_m);
        }
    }

    #[test]
    fn radius_boundary_is_inclusive_at_cap_edge() {
        // A point due east at exactly the radius must not be lost by the
        // longitude prefilter.
        let center = c(60.0, 30.0);
        let east = destination(center, 90.0, 300.0);
        let records = vec![(1usize, east)];
        let index = index_of(&records);
        assert_eq!(index.query_radius(center, 300.0 + 1e-6), vec![1]);
    }

    #[test]
    fn radius_query_across_antimeridian() {
        let records = vec![(1usize, c(0.0, 179.9995)), (2, c(0.0, -179.9995)), (3, c(0.0, 170.0))];
        let index = index_of(&records);
        let mut got = index.query_radius(c(0.0, 180.0), 100.0);
        got.sort_unstable();
        assert_eq!(got, vec![1, 2]);
    }

    #[test]
    fn radius_query_near_pole() {
        let records = vec![(1usize, c(89.9999, 0.0)), (2, c(89.9999, 180.0)), (3, c(89.0, 0.0))];
        let index = index_of(&records);
        let mut got = index.query_radius(c(90.0, 0.0), 50.0);
        got.sort_unstable();
        assert_eq!(got, vec![1, 2]);
    }

    #[test]
    fn invalid_query_inputs_return_nothing() {
        let index = index_of(&scattered(10, 3));
        assert!(index.query_radius(c(f64::NAN, 82.9), 100.0).is_empty());
        assert!(index.query_radius(c(55.0, 82.9), -1.0).is_empty());
        assert!(index.query_radius(c(55.0, 82.9), f64::NAN).is_empty());
    }

    #[test]
    fn polygon_query_matches_brute_force() {
        let records = scattered(2_000, 21);
        let index = index_of(&records);
        let area = buffer(c(55.0, 82.9), 2_000.0).unwrap();

        let got = index.query_polygon(&area);
        let expected: Vec<usize> = records
            .iter()
            .filter(|(_, at)| point_in_polygon(*at, &area))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(got, expected);
        assert!(!got.is_empty());
    }

    #[test]
    fn polygon_query_includes_vertices() {
        let square = Polygon::new(vec![c(55.0, 82.9), c(55.0, 83.0), c(55.1, 83.0), c(55.1, 82.9)]).unwrap();
        let records = vec![
            (1usize, c(55.0, 82.9)),
            (2, c(55.05, 83.0)),
            (3, c(55.05, 82.95)),
            (4, c(55.2, 82.95)),
        ];
        let index = index_of(&records);
        assert_eq!(index.query_polygon(&square), vec![1, 2, 3]);
    }

    #[test]
    fn bbox_query_is_inclusive() {
        let records = vec![(1usize, c(55.0, 82.9)), (2, c(55.1, 83.0)), (3, c(55.2, 83.0))];
        let index = index_of(&records);
        let bbox = BoundingBox {
            min_lat: 55.0,
            min_lng: 82.9,
            max_lat: 55.1,
            max_lng: 83.0,
        };
        let keys: Vec<usize> = index.query_bbox(&bbox).iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 2]);
    }

    #[test]
    fn nearest_returns_closest_first() {
        let records = scattered(300, 5);
        let index = index_of(&records);
        let center = c(55.0, 82.9);

        let got: Vec<usize> = index.nearest(center, 5).iter().map(|n| *n.key).collect();
        let mut by_distance: Vec<(f64, usize)> =
            records.iter().map(|(id, at)| (distance(center, *at), *id)).collect();
        by_distance.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        let expected: Vec<usize> = by_distance.iter().take(5).map(|(_, id)| *id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn nearest_with_k_larger_than_index() {
        let records = vec![(1usize, c(10.0, 10.0)), (2, c(-10.0, -170.0))];
        let index = index_of(&records);
        let got = index.nearest(c(0.0, 0.0), 10);
        assert_eq!(got.len(), 2);
        assert!(index.nearest(c(0.0, 0.0), 0).is_empty());
    }
}
