//! Workspace umbrella crate for geolink, a geospatial record-linkage and
//! polygon-membership engine.
//!
//! This crate stitches the component crates together so callers can load a
//! registry, resolve incoming records in batches and assign records to
//! regions through a single API entry point:
//!
//! - `geometry`: haversine distance, point-in-polygon, bounding boxes,
//!   area/centroid, circular buffers
//! - `spatial`: immutable R-tree over registry points, polygon/radius/nearest
//!   queries, region assignment
//! - `canonical`: address text normalization
//! - `similarity`: composite string similarity
//! - `ingest`: registry snapshot and incoming-record validation
//! - `matcher`: the staged resolver
//!
//! The [`batch`](BatchLinkageRunner) runner and the YAML
//! [`GeolinkConfig`] live here.

pub use canonical::{normalize, CanonicalError, NormalizerConfig, TextNormalizer};
pub use geometry::{
    area, bounding_box, buffer, centroid, destination, distance, point_in_polygon, BoundingBox,
    Coordinate, GeometryError, Polygon,
};
pub use ingest::{
    incoming_from_json, validate_incoming, AddressRecord, AddressRegistry, IncomingRecord,
    IngestError,
};
pub use matcher::{
    resolve, ConfidenceTier, LinkageConfig, LinkageContext, MatchError, MatchMethod, MatchResult,
    ResolveMetrics, ResolverConfig,
};
pub use similarity::{composite_text_similarity, SimilarityConfig, SimilarityError, SimilarityScorer};
pub use spatial::{
    assign_regions, regions_containing, IndexError, Region, RegionAssignment, SpatialIndex,
};

mod batch;
mod config;

pub use crate::batch::{
    run_batch, BatchConfig, BatchError, BatchLinkageRunner, BatchOutcome, BatchProgress,
    BatchReport, BatchStats, ProgressFn,
};
pub use crate::config::{ConfigLoadError, GeolinkConfig};

/// Build the spatial index over a registry, keyed by address id.
pub fn build_index(registry: &AddressRegistry) -> Result<SpatialIndex<String>, IndexError> {
    SpatialIndex::build(registry.records(), |record| {
        (record.id.clone(), record.coordinate)
    })
}

/// Address ids inside `polygon`, boundary included, in registry order.
pub fn query_polygon(index: &SpatialIndex<String>, polygon: &Polygon) -> Vec<String> {
    index.query_polygon(polygon)
}
