//! Polygons, bounding boxes, and the point-in-polygon test.
//!
//! ## Boundary convention
//!
//! A point lying on an edge or a vertex (within [`BOUNDARY_EPSILON_DEG`],
//! roughly a tenth of a millimetre) counts as **inside**. Region assignment
//! therefore never drops a listing that sits exactly on a drawn border.
//!
//! ## Planar approximations
//!
//! [`area`] and [`centroid`] project the ring onto a local equirectangular
//! plane centred on the bounding-box middle. For rings up to ~10 km across
//! and away from the poles the relative area error stays below 0.1%; it
//! grows with the latitude span because the projection uses a single
//! `cos(lat)` scale. Rings crossing the antimeridian are not supported.

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;
use crate::distance::EARTH_RADIUS_M;
use crate::error::GeometryError;

/// Perpendicular tolerance, in degrees, for the on-edge test.
pub const BOUNDARY_EPSILON_DEG: f64 = 1e-9;

/// A simple polygon stored as an open ring of at least three vertices.
///
/// The ring is implicitly closed: callers may pass it either open or with the
/// first vertex repeated at the end, both produce the same polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Polygon {
    vertices: Vec<Coordinate>,
}

impl Polygon {
    /// Validate and build a polygon.
    ///
    /// Consecutive duplicate vertices and an explicit closing vertex are
    /// dropped before counting, so `[a, b, a]` is rejected.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, GeometryError> {
        for p in &points {
            p.validate()?;
        }

        let mut vertices: Vec<Coordinate> = Vec::with_capacity(points.len());
        for p in points {
            if vertices.last() != Some(&p) {
                vertices.push(p);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    /// Vertices of the open ring.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Ring edges, including the closing edge from the last vertex back to
    /// the first.
    pub fn edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point_in_polygon(point, self)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        bounding_box(self)
    }
}

impl TryFrom<Vec<Coordinate>> for Polygon {
    type Error = GeometryError;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Polygon::new(points)
    }
}

impl From<Polygon> for Vec<Coordinate> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Axis-aligned box in degrees. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, p: Coordinate) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lng >= self.min_lng && p.lng <= self.max_lng
    }

    /// Lower corner in `[lng, lat]` order.
    pub fn lower_xy(&self) -> [f64; 2] {
        [self.min_lng, self.min_lat]
    }

    /// Upper corner in `[lng, lat]` order.
    pub fn upper_xy(&self) -> [f64; 2] {
        [self.max_lng, self.max_lat]
    }
}

/// Ray-casting containment test; boundary points count as inside.
pub fn point_in_polygon(point: Coordinate, polygon: &Polygon) -> bool {
    let [px, py] = point.to_xy();
    let mut inside = false;

    for (a, b) in polygon.edges() {
        let [ax, ay] = a.to_xy();
        let [bx, by] = b.to_xy();

        if on_segment(px, py, ax, ay, bx, by) {
            return true;
        }

        // Half-open rule on y so a ray through a vertex is counted once.
        if (ay > py) != (by > py) {
            let x_cross = ax + (py - ay) * (bx - ax) / (by - ay);
            if px < x_cross {
                inside = !inside;
            }
        }
    }

    inside
}

fn on_segment(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
    let dx = bx - ax;
    let dy = by - ay;
    let len = dx.hypot(dy);
    let cross = dx * (py - ay) - dy * (px - ax);
    if cross.abs() > BOUNDARY_EPSILON_DEG * len.max(f64::MIN_POSITIVE) {
        return false;
    }
    px >= ax.min(bx) - BOUNDARY_EPSILON_DEG
        && px <= ax.max(bx) + BOUNDARY_EPSILON_DEG
        && py >= ay.min(by) - BOUNDARY_EPSILON_DEG
        && py <= ay.max(by) + BOUNDARY_EPSILON_DEG
}

pub fn bounding_box(polygon: &Polygon) -> BoundingBox {
    let mut bbox = BoundingBox {
        min_lat: f64::INFINITY,
        min_lng: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        max_lng: f64::NEG_INFINITY,
    };
    for v in polygon.vertices() {
        bbox.min_lat = bbox.min_lat.min(v.lat);
        bbox.min_lng = bbox.min_lng.min(v.lng);
        bbox.max_lat = bbox.max_lat.max(v.lat);
        bbox.max_lng = bbox.max_lng.max(v.lng);
    }
    bbox
}

/// Local equirectangular frame anchored at the bounding-box centre.
struct LocalFrame {
    lat0: f64,
    lng0: f64,
    kx: f64,
    ky: f64,
}

impl LocalFrame {
    fn for_polygon(polygon: &Polygon) -> Self {
        let bbox = bounding_box(polygon);
        let lat0 = (bbox.min_lat + bbox.max_lat) / 2.0;
        let lng0 = (bbox.min_lng + bbox.max_lng) / 2.0;
        let ky = EARTH_RADIUS_M.to_radians();
        let kx = ky * lat0.to_radians().cos().max(1e-12);
        Self { lat0, lng0, kx, ky }
    }

    fn project(&self, c: Coordinate) -> (f64, f64) {
        ((c.lng - self.lng0) * self.kx, (c.lat - self.lat0) * self.ky)
    }

    fn unproject(&self, x: f64, y: f64) -> Coordinate {
        Coordinate {
            lat: self.lat0 + y / self.ky,
            lng: self.lng0 + x / self.kx,
        }
    }
}

fn signed_area_m2(frame: &LocalFrame, polygon: &Polygon) -> f64 {
    polygon
        .edges()
        .map(|(a, b)| {
            let (ax, ay) = frame.project(a);
            let (bx, by) = frame.project(b);
            ax * by - bx * ay
        })
        .sum::<f64>()
        / 2.0
}

/// Shoelace area in square meters.
pub fn area(polygon: &Polygon) -> f64 {
    let frame = LocalFrame::for_polygon(polygon);
    signed_area_m2(&frame, polygon).abs()
}

/// Area centroid. Degenerate (zero-area) rings fall back to the vertex mean.
pub fn centroid(polygon: &Polygon) -> Coordinate {
    let frame = LocalFrame::for_polygon(polygon);
    let signed = signed_area_m2(&frame, polygon);

    if signed.abs() < 1e-9 {
        let n = polygon.vertices().len() as f64;
        let (sum_lat, sum_lng) = polygon
            .vertices()
            .iter()
            .fold((0.0, 0.0), |(la, ln), v| (la + v.lat, ln + v.lng));
        return Coordinate {
            lat: sum_lat / n,
            lng: sum_lng / n,
        };
    }

    let (mut cx, mut cy) = (0.0, 0.0);
    for (a, b) in polygon.edges() {
        let (ax, ay) = frame.project(a);
        let (bx, by) = frame.project(b);
        let cross = ax * by - bx * ay;
        cx += (ax + bx) * cross;
        cy += (ay + by) * cross;
    }
    frame.unproject(cx / (6.0 * signed), cy / (6.0 * signed))
}
