use crate::error::IngestError;
use crate::types::{AddressRecord, IncomingRecord};

/// Strips control characters and trims; `None` when nothing is left.
pub(crate) fn sanitize_id(raw: &str) -> Option<String> {
    let filtered: String = raw.chars().filter(|c| !c.is_control()).collect();
    let trimmed = filtered.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Checks that an incoming record can be resolved at all.
///
/// Rejects an empty id, a NaN/out-of-range coordinate, and raw text that is
/// blank. Text that only normalizes to nothing (pure punctuation or noise
/// tokens) is accepted and later scores 0 against every candidate.
pub fn validate_incoming(record: &IncomingRecord) -> Result<(), IngestError> {
    if sanitize_id(&record.external_id).is_none() {
        return Err(IngestError::MissingId);
    }
    if !record.coordinate.is_valid() {
        return Err(IngestError::InvalidCoordinate {
            record_id: record.external_id.clone(),
            lat: record.coordinate.lat,
            lng: record.coordinate.lng,
        });
    }
    if record.raw_text.trim().is_empty() {
        return Err(IngestError::EmptyText {
            record_id: record.external_id.clone(),
        });
    }
    Ok(())
}

/// Sanitizes the id of a registry record and checks its coordinate.
pub(crate) fn validate_address(mut record: AddressRecord) -> Result<AddressRecord, IngestError> {
    record.id = sanitize_id(&record.id).ok_or(IngestError::MissingId)?;
    if !record.coordinate.is_valid() {
        return Err(IngestError::InvalidCoordinate {
            record_id: record.id,
            lat: record.coordinate.lat,
            lng: record.coordinate.lng,
        });
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use geometry::Coordinate;

    use super::*;

    fn incoming(id: &str, text: &str, lat: f64, lng: f64) -> IncomingRecord {
        IncomingRecord {
            external_id: id.into(),
            raw_text: text.into(),
            coordinate: Coordinate::new_unchecked(lat, lng),
        }
    }

    #[test]
    fn accepts_well_formed_record() {
        assert!(validate_incoming(&incoming("ext-1", "ул. Ленина, 10", 55.0, 82.9)).is_ok());
    }

    #[test]
    fn text_that_normalizes_to_nothing_is_accepted() {
        assert!(validate_incoming(&incoming("ext-1", "ул., д.", 55.0, 82.9)).is_ok());
    }

    #[test]
    fn rejects_bad_coordinates() {
        for (lat, lng) in [(f64::NAN, 82.9), (55.0, f64::INFINITY), (91.0, 0.0), (0.0, -180.5)] {
            let err = validate_incoming(&incoming("ext-2", "Lenina 10", lat, lng)).unwrap_err();
            assert!(matches!(err, IngestError::InvalidCoordinate { ref record_id, .. } if record_id == "ext-2"));
        }
    }

    #[test]
    fn rejects_blank_text_and_id() {
        assert_eq!(
            validate_incoming(&incoming("ext-3", " \t\n", 55.0, 82.9)),
            Err(IngestError::EmptyText {
                record_id: "ext-3".into()
            })
        );
        assert_eq!(
            validate_incoming(&incoming("\u{0007} ", "Lenina 10", 55.0, 82.9)),
            Err(IngestError::MissingId)
        );
    }

    #[test]
    fn address_ids_are_sanitized() {
        let record = AddressRecord {
            id: "  a-1\u{0000}\n".into(),
            canonical_text: "lenina 10".into(),
            coordinate: Coordinate::new_unchecked(55.0, 82.9),
        };
        assert_eq!(validate_address(record).unwrap().id, "a-1");
    }
}
