//! # geolink Spatial Index
//!
//! Bulk-loaded R-tree over point records, used by every resolver stage and by
//! region (area/segment) assignment.
//!
//! ## Layout
//!
//! The index is an arena plus a tree: [`SpatialIndex`] keeps the keys and
//! coordinates in a `Vec` and the R-tree stores only `[lng, lat]` points
//! tagged with the arena slot. Callers keep the full records in their own side
//! map and dereference keys there.
//!
//! ## Lifecycle
//!
//! An index is produced only by [`SpatialIndex::build`] and is immutable
//! afterwards; there is no insert or remove. When the registry changes, build
//! a new index. The value is `Send + Sync` whenever the key is, so a single
//! instance can serve concurrent queries from many threads.
//!
//! ## Query contract
//!
//! Every query first narrows candidates with an envelope search on the tree,
//! then confirms each candidate exactly (point-in-polygon or haversine
//! distance). Results therefore match a brute-force scan exactly; only the
//! confirmation pass is linear, and only in the candidate count.
//!
//! ## Example
//!
//! ```
//! use geometry::Coordinate;
//! use spatial::SpatialIndex;
//!
//! let records = vec![
//!     ("lenina-10", Coordinate::new(55.0, 82.9).unwrap()),
//!     ("lenina-12", Coordinate::new(55.0004, 82.9).unwrap()),
//! ];
//! let index = SpatialIndex::build(&records, |(id, at)| (id.to_string(), *at)).unwrap();
//!
//! let centre = Coordinate::new(55.0, 82.9).unwrap();
//! assert_eq!(index.query_radius(centre, 30.0), vec!["lenina-10".to_string()]);
//! assert_eq!(index.query_radius(centre, 100.0).len(), 2);
//! ```

mod query;
mod regions;

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use geometry::Coordinate;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use thiserror::Error;
use tracing::info;

pub use crate::query::Neighbor;
pub use crate::regions::{assign_regions, regions_containing, Region, RegionAssignment};

/// Tree element: a `[lng, lat]` point tagged with its arena slot.
type TreePoint = GeomWithData<[f64; 2], usize>;

/// Errors raised while building an index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    #[error("record {key} has an invalid coordinate (lat={lat}, lng={lng})")]
    InvalidCoordinate { key: String, lat: f64, lng: f64 },
    #[error("duplicate key {0} in index input")]
    DuplicateKey(String),
}

/// One indexed point.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry<K> {
    pub key: K,
    pub coordinate: Coordinate,
}

/// Immutable point index. See the crate docs for the query contract.
pub struct SpatialIndex<K> {
    tree: RTree<TreePoint>,
    entries: Vec<IndexEntry<K>>,
}

impl<K: Debug> Debug for SpatialIndex<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K> SpatialIndex<K>
where
    K: Clone + Eq + Hash + Debug,
{
    /// Bulk-load an index from `records`, using `entry_of` to extract each
    /// record's key and coordinate. O(n log n).
    ///
    /// Fails on the first invalid coordinate or repeated key; a partially
    /// built index is never returned.
    pub fn build<T, F>(records: &[T], entry_of: F) -> Result<Self, IndexError>
    where
        F: Fn(&T) -> (K, Coordinate),
    {
        let start = Instant::now();
        let mut seen: HashSet<K> = HashSet::with_capacity(records.len());
        let mut entries = Vec::with_capacity(records.len());
        let mut points = Vec::with_capacity(records.len());

        for record in records {
            let (key, coordinate) = entry_of(record);
            if !coordinate.is_valid() {
                return Err(IndexError::InvalidCoordinate {
                    key: format!("{key:?}"),
                    lat: coordinate.lat,
                    lng: coordinate.lng,
                });
            }
            if !seen.insert(key.clone()) {
                return Err(IndexError::DuplicateKey(format!("{key:?}")));
            }
            points.push(TreePoint::new(coordinate.to_xy(), entries.len()));
            entries.push(IndexEntry { key, coordinate });
        }

        let tree = RTree::bulk_load(points);
        info!(
            entries = entries.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "spatial_index_built"
        );
        Ok(Self { tree, entries })
    }
}

impl<K> SpatialIndex<K> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in build order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry<K>> {
        self.entries.iter()
    }

    fn entry(&self, slot: usize) -> &IndexEntry<K> {
        &self.entries[slot]
    }
}
