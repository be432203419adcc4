#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The canonical incident dataset.
//!
//! A [`Dataset`] is built once from a source spreadsheet and is read-only
//! afterwards. Rows that cannot be repaired are dropped and counted in the
//! [`LoadReport`]. A load that produces no incidents at all is a
//! [`LoadError`], so a successfully loaded dataset is never empty and
//! callers never confuse "not loaded" with "nothing matched".
//!
//! [`Repository`] holds the cached dataset for a process and is the handle
//! passed to the query layer.

pub mod repository;
pub mod summary;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use violence_map_incident_models::Incident;
use violence_map_source::SourceError;
use violence_map_source::columns::ColumnMapping;
use violence_map_source::normalize::{RecordNormalizer, RecordRejection};
use violence_map_source::reader::{CsvTable, read_csv, read_csv_path};

pub use repository::Repository;

/// Errors that make a dataset unavailable.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be read or is not a usable table.
    #[error("Failed to read source: {0}")]
    Source(#[from] SourceError),

    /// The source was read but every row was rejected.
    #[error("No valid incidents in source ({total} rows, {rejected} rejected)")]
    NoValidRecords {
        /// Data rows in the source.
        total: u64,
        /// Rows rejected during normalization.
        rejected: u64,
    },
}

/// Per-reason counts of rows left out of the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionCounts {
    /// Rows with an unusable latitude.
    pub invalid_latitude: u64,
    /// Rows with an unusable longitude.
    pub invalid_longitude: u64,
    /// Rows without a year.
    pub missing_year: u64,
}

impl RejectionCounts {
    /// Counts one rejected row.
    pub const fn record(&mut self, reason: RecordRejection) {
        match reason {
            RecordRejection::InvalidLatitude => self.invalid_latitude += 1,
            RecordRejection::InvalidLongitude => self.invalid_longitude += 1,
            RecordRejection::MissingYear => self.missing_year += 1,
        }
    }

    /// Total rejected rows.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.invalid_latitude + self.invalid_longitude + self.missing_year
    }
}

/// Diagnostics from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows read from the source.
    pub total_rows: u64,
    /// Rows that became incidents.
    pub accepted: u64,
    /// Rows left out, by reason.
    pub rejected: RejectionCounts,
}

/// A validated, immutable set of incidents.
#[derive(Debug, Clone)]
pub struct Dataset {
    incidents: Vec<Incident>,
    report: LoadReport,
    year_bounds: (i32, i32),
}

impl Dataset {
    /// Loads and normalizes a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Source`] if the file cannot be read or lacks a
    /// required column, or [`LoadError::NoValidRecords`] if no row survives
    /// normalization.
    pub fn load(path: &Path, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        log::info!("Loading incidents from {}", path.display());
        let table = read_csv_path(path, mapping.delimiter_byte()?)?;
        Self::from_table(&table, mapping)
    }

    /// Loads and normalizes CSV data from any reader.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_reader<R: Read>(reader: R, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let table = read_csv(reader, mapping.delimiter_byte()?)?;
        Self::from_table(&table, mapping)
    }

    /// Normalizes an already-parsed table.
    ///
    /// Ids are assigned by row order, counting rejected rows too, so an id
    /// always points back at the same source row.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Source`] if a required column is missing, or
    /// [`LoadError::NoValidRecords`] if no row survives normalization.
    pub fn from_table(table: &CsvTable, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let columns = mapping.resolve(&table.headers)?;
        let normalizer = RecordNormalizer::new(columns, mapping);

        let mut report = LoadReport::default();
        let mut incidents = Vec::with_capacity(table.records.len());

        for (row, record) in (0_u64..).zip(&table.records) {
            report.total_rows += 1;
            match normalizer.normalize(row, record) {
                Ok(incident) => incidents.push(incident),
                Err(reason) => {
                    log::debug!("Rejected row {row}: {reason}");
                    report.rejected.record(reason);
                }
            }
        }
        report.accepted = incidents.len() as u64;

        let rejected = report.rejected.total();
        if rejected > 0 {
            log::warn!(
                "Rejected {rejected} of {} rows (latitude: {}, longitude: {}, year: {})",
                report.total_rows,
                report.rejected.invalid_latitude,
                report.rejected.invalid_longitude,
                report.rejected.missing_year,
            );
        }

        let Some(year_bounds) = year_bounds(&incidents) else {
            return Err(LoadError::NoValidRecords {
                total: report.total_rows,
                rejected,
            });
        };

        log::info!(
            "Loaded {} incidents spanning {}-{}",
            report.accepted,
            year_bounds.0,
            year_bounds.1
        );

        Ok(Self {
            incidents,
            report,
            year_bounds,
        })
    }

    /// All incidents, in source row order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Always `false` for a loaded dataset; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Load diagnostics.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Earliest and latest incident year, inclusive.
    #[must_use]
    pub const fn year_bounds(&self) -> (i32, i32) {
        self.year_bounds
    }
}

fn year_bounds(incidents: &[Incident]) -> Option<(i32, i32)> {
    incidents.iter().fold(None, |bounds, incident| {
        Some(bounds.map_or((incident.year, incident.year), |(min, max): (i32, i32)| {
            (min.min(incident.year), max.max(incident.year))
        }))
    })
}
