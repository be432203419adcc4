//! Column mapping configuration.
//!
//! A [`ColumnMapping`] names the spreadsheet headers each [`Incident`]
//! field is read from. The default matches the published dataset; other
//! exports can supply a TOML file overriding any subset of the keys (see
//! `columns/default.toml` for the full format).
//!
//! [`Incident`]: violence_map_incident_models::Incident

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::SourceError;

/// Header names for every incident field, plus parsing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Latitude column (required).
    pub latitude: String,
    /// Longitude column (required).
    pub longitude: String,
    /// Year column (required).
    pub year: String,
    /// Month column.
    pub month: String,
    /// Day column.
    pub day: String,
    /// Victim name column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub victim_name: Vec<String>,
    /// Description column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub description: Vec<String>,
    /// Action type column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub action_type: Vec<String>,
    /// Victim gender column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub victim_gender: Vec<String>,
    /// Victim ethnicity column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub victim_ethnicity: Vec<String>,
    /// Affiliation column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub affiliation: Vec<String>,
    /// City column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub city: Vec<String>,
    /// Dispute column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub dispute: Vec<String>,
    /// Instrument column aliases.
    #[serde(deserialize_with = "one_or_many")]
    pub instrument: Vec<String>,
    /// Month/day values meaning "not recorded".
    pub unknown_markers: Vec<String>,
    /// CSV field delimiter.
    pub delimiter: char,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
            year: "Ano".to_string(),
            month: "Mês".to_string(),
            day: "Dia".to_string(),
            victim_name: vec![
                "Vítima_Nome Civil_(Apelido/Nome Social)".to_string(),
                "Vítima_Nome Civil*(Apelido/Nome Social)".to_string(),
            ],
            description: vec!["Descrição".to_string()],
            action_type: vec!["Tipo_ação_vítima".to_string()],
            victim_gender: vec!["Vítima_Gênero/Sexo".to_string()],
            victim_ethnicity: vec!["Vítimas_Etnia".to_string()],
            affiliation: vec!["Vítimas_Afiliação_1/Grupo".to_string()],
            city: vec!["Cidade".to_string()],
            dispute: vec!["Disputa".to_string()],
            instrument: vec!["Instrumento_1".to_string()],
            unknown_markers: vec!["SI".to_string(), "unknown".to_string()],
            delimiter: ',',
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

/// Actual header names found in one file, one per incident field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// Latitude header.
    pub latitude: String,
    /// Longitude header.
    pub longitude: String,
    /// Year header.
    pub year: String,
    /// Month header, if present.
    pub month: Option<String>,
    /// Day header, if present.
    pub day: Option<String>,
    /// Victim name header, if present.
    pub victim_name: Option<String>,
    /// Description header, if present.
    pub description: Option<String>,
    /// Action type header, if present.
    pub action_type: Option<String>,
    /// Victim gender header, if present.
    pub victim_gender: Option<String>,
    /// Victim ethnicity header, if present.
    pub victim_ethnicity: Option<String>,
    /// Affiliation header, if present.
    pub affiliation: Option<String>,
    /// City header, if present.
    pub city: Option<String>,
    /// Dispute header, if present.
    pub dispute: Option<String>,
    /// Instrument header, if present.
    pub instrument: Option<String>,
}

impl ColumnMapping {
    /// Parses a mapping from TOML. Keys left out keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SourceError> {
        toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
            message: e.to_string(),
        })
    }

    /// Reads a mapping from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read, or
    /// [`SourceError::Config`] if it is malformed.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded column mapping from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Returns the delimiter as a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] for a non-ASCII delimiter.
    pub fn delimiter_byte(&self) -> Result<u8, SourceError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| SourceError::Config {
                message: format!("delimiter {:?} is not a single ASCII character", self.delimiter),
            })
    }

    /// Matches this mapping against the (trimmed) headers of one file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if the latitude, longitude,
    /// or year column is absent.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, SourceError> {
        let required = |name: &str| {
            find_header(headers, &[name.to_string()]).ok_or_else(|| SourceError::MissingColumn {
                column: name.to_string(),
            })
        };
        let optional = |field: &str, aliases: &[String]| {
            let found = find_header(headers, aliases);
            if found.is_none() {
                log::debug!("No column for {field} (tried {aliases:?}), field will be empty");
            }
            found
        };

        Ok(ResolvedColumns {
            latitude: required(&self.latitude)?,
            longitude: required(&self.longitude)?,
            year: required(&self.year)?,
            month: optional("month", std::slice::from_ref(&self.month)),
            day: optional("day", std::slice::from_ref(&self.day)),
            victim_name: optional("victim_name", &self.victim_name),
            description: optional("description", &self.description),
            action_type: optional("action_type", &self.action_type),
            victim_gender: optional("victim_gender", &self.victim_gender),
            victim_ethnicity: optional("victim_ethnicity", &self.victim_ethnicity),
            affiliation: optional("affiliation", &self.affiliation),
            city: optional("city", &self.city),
            dispute: optional("dispute", &self.dispute),
            instrument: optional("instrument", &self.instrument),
        })
    }
}

fn find_header(headers: &[String], aliases: &[String]) -> Option<String> {
    aliases
        .iter()
        .map(|alias| alias.trim())
        .find(|alias| headers.iter().any(|h| h == alias))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn bundled_toml_matches_default() {
        let parsed = ColumnMapping::from_toml_str(include_str!("../columns/default.toml")).unwrap();
        assert_eq!(parsed, ColumnMapping::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let parsed = ColumnMapping::from_toml_str(
            r#"
            year = "Year"
            city = ["City", "Municipality"]
            delimiter = ";"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.year, "Year");
        assert_eq!(parsed.city, vec!["City", "Municipality"]);
        assert_eq!(parsed.latitude, "Latitude");
        assert_eq!(parsed.delimiter_byte().unwrap(), b';');
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = ColumnMapping::from_toml_str("year = [").unwrap_err();
        assert!(matches!(err, SourceError::Config { .. }));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let mapping = ColumnMapping {
            delimiter: '§',
            ..ColumnMapping::default()
        };
        assert!(mapping.delimiter_byte().is_err());
    }

    #[test]
    fn resolves_first_present_alias() {
        let mapping = ColumnMapping::default();
        let resolved = mapping
            .resolve(&headers(&[
                "Latitude",
                "Longitude",
                "Ano",
                "Vítima_Nome Civil*(Apelido/Nome Social)",
            ]))
            .unwrap();
        assert_eq!(
            resolved.victim_name.as_deref(),
            Some("Vítima_Nome Civil*(Apelido/Nome Social)")
        );
        assert!(resolved.city.is_none());
        assert!(resolved.month.is_none());
    }

    #[test]
    fn missing_required_column_fails() {
        let mapping = ColumnMapping::default();
        let err = mapping
            .resolve(&headers(&["Latitude", "Ano"]))
            .unwrap_err();
        match err {
            SourceError::MissingColumn { column } => assert_eq!(column, "Longitude"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
