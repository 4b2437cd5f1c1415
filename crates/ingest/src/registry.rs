use std::collections::HashMap;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::IngestError;
use crate::types::AddressRecord;
use crate::validate::validate_address;

/// Read-only snapshot of the address registry.
///
/// Records live in an arena `Vec` in load order; `by_id` maps each id to its
/// slot. The spatial index stores ids only and callers resolve them here.
#[derive(Debug, Clone, Default)]
pub struct AddressRegistry {
    records: Vec<AddressRecord>,
    by_id: HashMap<String, usize>,
}

impl AddressRegistry {
    /// Load a registry, rejecting invalid records and duplicate ids.
    pub fn from_records(records: Vec<AddressRecord>) -> Result<Self, IngestError> {
        let start = Instant::now();
        let mut registry = Self {
            records: Vec::with_capacity(records.len()),
            by_id: HashMap::with_capacity(records.len()),
        };
        for record in records {
            let record = validate_address(record).inspect_err(|err| {
                warn!(error = %err, "registry_record_rejected");
            })?;
            if registry.by_id.contains_key(&record.id) {
                warn!(address_id = %record.id, "registry_duplicate_id");
                return Err(IngestError::DuplicateAddressId(record.id));
            }
            registry.by_id.insert(record.id.clone(), registry.records.len());
            registry.records.push(record);
        }
        info!(
            records = registry.records.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "registry_loaded"
        );
        Ok(registry)
    }

    /// Load a registry from a JSON array of address records.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        let records: Vec<AddressRecord> =
            serde_json::from_str(json).map_err(|e| IngestError::Parse(e.to_string()))?;
        Self::from_records(records)
    }

    pub fn get(&self, id: &str) -> Option<&AddressRecord> {
        self.by_id.get(id).map(|&slot| &self.records[slot])
    }

    /// Arena slot of `id`; slots follow load order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order.
    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddressRecord> {
        self.records.iter()
    }
}
