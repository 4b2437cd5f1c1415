use thiserror::Error;

/// Errors raised while constructing geometric values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("polygon requires at least 3 distinct vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("radius must be a finite, non-negative number of meters, got {0}")]
    InvalidRadius(f64),
}
