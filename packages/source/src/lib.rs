#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reading and normalization of political-violence incident spreadsheets.
//!
//! The pipeline is: [`reader`] turns a CSV file into untyped [`RawRecord`]s,
//! [`columns`] decides which header feeds which field, and [`normalize`]
//! maps each row to a validated [`Incident`](violence_map_incident_models::Incident)
//! using the [`coordinates`] and [`dates`] repair heuristics.

pub mod columns;
pub mod coordinates;
pub mod dates;
pub mod normalize;
pub mod reader;

/// One untyped input row, keyed by trimmed column name.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur while reading a source file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file is not a usable table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required column is not in the header row.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// The column mapping configuration is invalid.
    #[error("Column mapping error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
