//! Error types produced by the ingest crate.
//!
//! | Error | Raised for |
//! |-------|------------|
//! | [`MissingId`](IngestError::MissingId) | id empty after sanitization |
//! | [`InvalidCoordinate`](IngestError::InvalidCoordinate) | NaN, infinite or out-of-range lat/lng |
//! | [`EmptyText`](IngestError::EmptyText) | blank raw text on an incoming record |
//! | [`DuplicateAddressId`](IngestError::DuplicateAddressId) | registry id seen twice |
//! | [`Parse`](IngestError::Parse) | malformed registry or batch JSON |
//!
//! The first three are per-record failures: the batch runner records them and
//! moves on. The last two abort loading.
use thiserror::Error;

/// Errors raised while loading or validating records.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum IngestError {
    #[error("record has an empty id")]
    MissingId,

    #[error("record {record_id} has an invalid coordinate (lat={lat}, lng={lng})")]
    InvalidCoordinate { record_id: String, lat: f64, lng: f64 },

    #[error("record {record_id} has empty address text")]
    EmptyText { record_id: String },

    #[error("duplicate address id {0} in registry")]
    DuplicateAddressId(String),

    #[error("malformed input: {0}")]
    Parse(String),
}

impl IngestError {
    /// True for failures that affect one record only.
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            IngestError::MissingId
                | IngestError::InvalidCoordinate { .. }
                | IngestError::EmptyText { .. }
        )
    }
}
