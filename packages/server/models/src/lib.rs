#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the violence map server.
//!
//! These types are serialized to JSON for the REST API. Projection payloads
//! reuse the query-layer types directly; this crate only adds the
//! envelopes and the query-string form of a filter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use violence_map_dataset::LoadReport;
use violence_map_dataset::summary::Facets;
use violence_map_query_models::{
    AnimationFrame, FilterSpec, LayerGroup, MapFrame, MapPoint, TimelineEvent, YearRange,
};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Whether the dataset is loaded.
    pub ready: bool,
}

/// Filter options plus the filter a fresh dashboard starts with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFacets {
    /// Distinct values per dimension.
    #[serde(flatten)]
    pub facets: Facets,
    /// Initial filter.
    pub default_filter: FilterSpec,
}

/// Response from the map endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    /// One marker per matching incident.
    pub points: Vec<MapPoint>,
    /// Center and extent to show.
    pub frame: MapFrame,
    /// Toggleable marker groups.
    pub layers: Vec<LayerGroup>,
    /// `true` when nothing matched the filter.
    pub empty: bool,
}

/// Response from the timeline endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTimeline {
    /// Dated events in chronological order.
    pub events: Vec<TimelineEvent>,
    /// `true` when nothing matched the filter.
    pub empty: bool,
}

/// Response from the animation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnimation {
    /// One frame per year, ascending.
    pub frames: Vec<AnimationFrame>,
}

/// Response from the reload endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReload {
    /// Incidents in the reloaded dataset.
    pub incidents: u64,
    /// Diagnostics from the load.
    pub report: LoadReport,
}

/// Query parameters shared by the map, timeline, and animation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// First year to include. Defaults to the dataset's first year.
    pub from_year: Option<i32>,
    /// Last year to include. Defaults to the dataset's last year.
    pub to_year: Option<i32>,
    /// Comma-separated list of action types to include.
    pub action_types: Option<String>,
    /// Comma-separated list of victim genders to include.
    pub genders: Option<String>,
    /// Comma-separated list of victim ethnicities to include.
    pub ethnicities: Option<String>,
}

impl FilterQueryParams {
    /// Builds a filter, filling missing year bounds from `year_bounds`.
    ///
    /// Absent or empty lists leave their dimension unrestricted.
    #[must_use]
    pub fn to_filter_spec(&self, year_bounds: (i32, i32)) -> FilterSpec {
        let (min, max) = year_bounds;
        FilterSpec {
            year_range: YearRange::new(self.from_year.unwrap_or(min), self.to_year.unwrap_or(max)),
            action_types: split_list(self.action_types.as_deref()),
            genders: split_list(self.genders.as_deref()),
            ethnicities: split_list(self.ethnicities.as_deref()),
        }
    }
}

/// Splits a comma-separated list, trimming entries and skipping blanks.
#[must_use]
pub fn split_list(list: Option<&str>) -> BTreeSet<String> {
    list.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_cover_the_whole_dataset() {
        let spec = FilterQueryParams::default().to_filter_spec((2003, 2023));
        assert_eq!(spec.year_range, YearRange::new(2003, 2023));
        assert!(spec.action_types.is_empty());
        assert!(spec.genders.is_empty());
        assert!(spec.ethnicities.is_empty());
    }

    #[test]
    fn lists_are_trimmed_and_blanks_skipped() {
        let params = FilterQueryParams {
            from_year: Some(2010),
            action_types: Some(" Assassinato , ,Ameaça de assassinato".to_string()),
            genders: Some(String::new()),
            ..FilterQueryParams::default()
        };
        let spec = params.to_filter_spec((2003, 2023));
        assert_eq!(spec.year_range, YearRange::new(2010, 2023));
        assert_eq!(
            spec.action_types.into_iter().collect::<Vec<_>>(),
            vec!["Ameaça de assassinato", "Assassinato"]
        );
        assert!(spec.genders.is_empty());
    }

    #[test]
    fn params_use_camel_case() {
        let params: FilterQueryParams =
            serde_json::from_str(r#"{"fromYear":2001,"toYear":2002,"ethnicities":"Parda"}"#)
                .unwrap();
        assert_eq!(params.from_year, Some(2001));
        assert_eq!(params.to_year, Some(2002));
        assert_eq!(split_list(params.ethnicities.as_deref()).len(), 1);
    }
}
