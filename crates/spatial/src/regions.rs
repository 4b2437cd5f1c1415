//! Area/segment assignment over user-drawn regions.

use geometry::{point_in_polygon, Coordinate, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SpatialIndex;

/// A named, user-drawn area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub polygon: Polygon,
}

/// Members of one region, in index build order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAssignment<K> {
    pub region_id: String,
    pub members: Vec<K>,
}

/// Assign every indexed key to each region containing it. Regions may
/// overlap, so a key can appear under several regions. Output follows the
/// order of `regions`.
pub fn assign_regions<K: Clone>(
    index: &SpatialIndex<K>,
    regions: &[Region],
) -> Vec<RegionAssignment<K>> {
    regions
        .iter()
        .map(|region| {
            let members = index.query_polygon(&region.polygon);
            debug!(region_id = %region.id, members = members.len(), "region_assigned");
            RegionAssignment {
                region_id: region.id.clone(),
                members,
            }
        })
        .collect()
}

/// Ids of the regions containing `point`, in input order.
pub fn regions_containing(regions: &[Region], point: Coordinate) -> Vec<&str> {
    regions
        .iter()
        .filter(|region| point_in_polygon(point, &region.polygon))
        .map(|region| region.id.as_str())
        .collect()
}
