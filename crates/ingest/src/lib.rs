//! geolink ingest layer.
//!
//! Records enter the linkage engine here. Two kinds exist:
//!
//! - [`AddressRecord`]: the canonical registry entry, loaded once per
//!   registry version into an [`AddressRegistry`].
//! - [`IncomingRecord`]: a loosely geocoded record from a batch, checked with
//!   [`validate_incoming`] before resolution.
//!
//! Registry loading is all-or-nothing: one bad record or duplicate id aborts
//! it. Incoming-record validation is per record, so one malformed listing
//! never stops a batch.
//!
//! ```
//! use geometry::Coordinate;
//! use ingest::{validate_incoming, AddressRecord, AddressRegistry, IncomingRecord};
//!
//! let registry = AddressRegistry::from_records(vec![AddressRecord {
//!     id: "a-1".into(),
//!     canonical_text: "lenina 10".into(),
//!     coordinate: Coordinate::new(55.0, 82.9).unwrap(),
//! }])
//! .unwrap();
//! assert!(registry.get("a-1").is_some());
//!
//! let listing = IncomingRecord {
//!     external_id: "ext-1".into(),
//!     raw_text: "ул. Ленина, 10".into(),
//!     coordinate: Coordinate::new(55.0001, 82.9001).unwrap(),
//! };
//! assert!(validate_incoming(&listing).is_ok());
//! ```

mod error;
mod registry;
mod types;
mod validate;

pub use crate::error::IngestError;
pub use crate::registry::AddressRegistry;
pub use crate::types::{AddressRecord, IncomingRecord};
pub use crate::validate::validate_incoming;

/// Parse a JSON array of incoming records. Coordinates are not checked here;
/// invalid ones surface per record during resolution.
pub fn incoming_from_json(json: &str) -> Result<Vec<IncomingRecord>, IngestError> {
    serde_json::from_str(json).map_err(|e| IngestError::Parse(e.to_string()))
}
