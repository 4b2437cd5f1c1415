use geometry::Coordinate;
use serde::{Deserialize, Serialize};

/// Immutable registry entry. Owned and versioned outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub id: String,
    pub canonical_text: String,
    pub coordinate: Coordinate,
}

/// A loosely geocoded record to resolve against the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingRecord {
    pub external_id: String,
    pub raw_text: String,
    pub coordinate: Coordinate,
}
