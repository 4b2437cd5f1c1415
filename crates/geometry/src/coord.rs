use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A WGS-84 position in decimal degrees.
///
/// Construction through [`Coordinate::new`] validates the range; the public
/// fields stay writable so records can be deserialized as-is and checked
/// later with [`Coordinate::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN/infinite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeometryError> {
        let coord = Self { lat, lng };
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeometryError::InvalidCoordinate { lat, lng })
        }
    }

    /// Build a coordinate without range checks. Intended for tests and for
    /// values already known to be valid.
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns `Err` when the coordinate is not usable for matching.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeometryError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// `[lng, lat]` ordering used by planar algorithms and the R-tree.
    #[inline]
    pub fn to_xy(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}
