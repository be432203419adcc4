//! Mapping of raw rows to validated incidents.
//!
//! Each row is mapped independently and purely: a [`RawRecord`] either
//! becomes an [`Incident`] or is rejected with a [`RecordRejection`]. No
//! row can abort the load.

use serde_json::Value;
use violence_map_incident_models::{Incident, is_valid_latitude, is_valid_longitude};

use crate::RawRecord;
use crate::columns::{ColumnMapping, ResolvedColumns};
use crate::coordinates::normalize_coordinate;
use crate::dates::{parse_component, parse_year, resolve_date};

/// Why a row was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum RecordRejection {
    /// Latitude missing, unparseable, or outside `[-90, 90]` after repair.
    #[error("invalid latitude")]
    InvalidLatitude,
    /// Longitude missing, unparseable, or outside `[-180, 180]` after repair.
    #[error("invalid longitude")]
    InvalidLongitude,
    /// Year missing or unparseable.
    #[error("missing year")]
    MissingYear,
}

/// Maps rows of one file using its resolved columns.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    columns: ResolvedColumns,
    unknown_markers: Vec<String>,
}

static NULL: Value = Value::Null;

impl RecordNormalizer {
    /// Creates a normalizer for a file whose headers resolved to `columns`.
    #[must_use]
    pub fn new(columns: ResolvedColumns, mapping: &ColumnMapping) -> Self {
        Self {
            columns,
            unknown_markers: mapping.unknown_markers.clone(),
        }
    }

    /// Maps one row to an incident with the given id.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordRejection`] that applies to the row.
    pub fn normalize(&self, id: u64, record: &RawRecord) -> Result<Incident, RecordRejection> {
        let cols = &self.columns;

        let latitude = normalize_coordinate(field(record, Some(&cols.latitude)))
            .filter(|v| is_valid_latitude(*v))
            .ok_or(RecordRejection::InvalidLatitude)?;
        let longitude = normalize_coordinate(field(record, Some(&cols.longitude)))
            .filter(|v| is_valid_longitude(*v))
            .ok_or(RecordRejection::InvalidLongitude)?;
        let year = parse_year(field(record, Some(&cols.year))).ok_or(RecordRejection::MissingYear)?;

        let month = parse_component(field(record, cols.month.as_ref()), &self.unknown_markers);
        let day = parse_component(field(record, cols.day.as_ref()), &self.unknown_markers);
        let date = resolve_date(Some(year), month, day);

        Ok(Incident {
            id,
            latitude,
            longitude,
            year,
            month,
            day,
            date,
            victim_name: text(record, cols.victim_name.as_ref()),
            description: text(record, cols.description.as_ref()),
            action_type: text(record, cols.action_type.as_ref()),
            victim_gender: text(record, cols.victim_gender.as_ref()),
            victim_ethnicity: text(record, cols.victim_ethnicity.as_ref()),
            affiliation: text(record, cols.affiliation.as_ref()),
            city: text(record, cols.city.as_ref()),
            dispute: text(record, cols.dispute.as_ref()),
            instrument: text(record, cols.instrument.as_ref()),
        })
    }
}

fn field<'a>(record: &'a RawRecord, column: Option<&String>) -> &'a Value {
    column.and_then(|c| record.get(c)).unwrap_or(&NULL)
}

/// Reads a descriptive field verbatim. Blank cells are absent.
fn text(record: &RawRecord, column: Option<&String>) -> Option<String> {
    match field(record, column) {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
