//! CSV reading into raw, untyped records.
//!
//! Each data row becomes a [`RawRecord`]: a JSON object keyed by the
//! trimmed header names with every cell as a trimmed string. Typing and
//! validation happen later in [`crate::normalize`].

use std::io::Read;
use std::path::Path;

use crate::{RawRecord, SourceError};

/// All rows of one CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    /// Header names, trimmed.
    pub headers: Vec<String>,
    /// One record per data row, in file order.
    pub records: Vec<RawRecord>,
}

/// Reads a CSV file from disk.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened, or a CSV/parse
/// error if its contents are not a readable table.
pub fn read_csv_path(path: &Path, delimiter: u8) -> Result<CsvTable, SourceError> {
    log::debug!("Opening {}", path.display());
    let file = std::fs::File::open(path)?;
    let table = read_csv(file, delimiter)?;
    log::info!(
        "Parsed {} records from CSV at {}",
        table.records.len(),
        path.display()
    );
    Ok(table)
}

/// Reads CSV data from any reader.
///
/// Rows may have fewer or more cells than the header; missing cells read
/// as empty strings and extra cells are ignored.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] on malformed input (including invalid
/// UTF-8), or [`SourceError::Parse`] if there is no header row.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<CsvTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(SourceError::Parse(
            "CSV file contains no header row".to_owned(),
        ));
    }

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;

        let mut map = RawRecord::new();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim().to_owned();
            map.insert(header.clone(), serde_json::Value::String(value));
        }
        records.push(map);
    }

    Ok(CsvTable { headers, records })
}
