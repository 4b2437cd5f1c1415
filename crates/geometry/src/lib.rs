//! geolink geometry kernel.
//!
//! Geodetic primitives used by the spatial index and the address resolver.
//! Everything here is a pure function of its inputs: no I/O, no global state.
//!
//! ## What we provide
//!
//! - [`Coordinate`] with range validation (NaN and out-of-range values are
//!   rejected, never silently clamped)
//! - [`distance`]: haversine distance in meters on a sphere of
//!   [`EARTH_RADIUS_M`]
//! - [`Polygon`]: implicitly closed ring of at least 3 vertices, plus
//!   [`point_in_polygon`], [`bounding_box`], [`centroid`] and [`area`]
//! - [`buffer`]: circle approximation as a regular polygon
//!
//! See the `polygon` module docs for the boundary convention and the error
//! bound of the planar area approximation.
//!
//! ## Example
//!
//! ```
//! use geometry::{buffer, point_in_polygon, Coordinate};
//!
//! let centre = Coordinate::new(55.0, 82.9).unwrap();
//! let area = buffer(centre, 100.0).unwrap();
//! let nearby = Coordinate::new(55.0003, 82.9).unwrap(); // ~33 m north
//! assert!(point_in_polygon(nearby, &area));
//! ```

mod coord;
mod distance;
mod error;
mod polygon;

pub use crate::coord::Coordinate;
pub use crate::distance::{
    buffer, destination, distance, meters_to_lat_degrees, meters_to_lng_degrees, BUFFER_SEGMENTS,
    EARTH_RADIUS_M,
};
pub use crate::error::GeometryError;
pub use crate::polygon::{
    area, bounding_box, centroid, point_in_polygon, BoundingBox, Polygon, BOUNDARY_EPSILON_DEG,
};
