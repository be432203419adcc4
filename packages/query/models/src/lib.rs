#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter specification and presentation-ready projection types.
//!
//! These are the values exchanged between the query layer and its
//! consumers (HTTP API, CLI, any rendering front end). They carry no
//! behavior beyond simple accessors.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use violence_map_incident_models::{ActionKind, DateKind, MarkerColor};

/// Inclusive year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First accepted year.
    pub min: i32,
    /// Last accepted year.
    pub max: i32,
}

impl YearRange {
    /// Creates a range. A `min` above `max` accepts no year.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `year` lies within the bounds.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// User-selected constraints defining a filtered view.
///
/// For each categorical dimension an empty set means "no restriction",
/// not "nothing matches". Dimensions are combined with AND; values within
/// one dimension with OR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Accepted years.
    pub year_range: YearRange,
    /// Accepted action types (verbatim text).
    #[serde(default)]
    pub action_types: BTreeSet<String>,
    /// Accepted victim genders.
    #[serde(default)]
    pub genders: BTreeSet<String>,
    /// Accepted victim ethnicities.
    #[serde(default)]
    pub ethnicities: BTreeSet<String>,
}

impl FilterSpec {
    /// A filter restricting only the year.
    #[must_use]
    pub const fn new(year_range: YearRange) -> Self {
        Self {
            year_range,
            action_types: BTreeSet::new(),
            genders: BTreeSet::new(),
            ethnicities: BTreeSet::new(),
        }
    }

    /// Restricts action types.
    #[must_use]
    pub fn with_action_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action_types = values.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts victim genders.
    #[must_use]
    pub fn with_genders<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genders = values.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts victim ethnicities.
    #[must_use]
    pub fn with_ethnicities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ethnicities = values.into_iter().map(Into::into).collect();
        self
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl LatLon {
    /// Creates a pair.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Incident id.
    pub id: u64,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Classified action kind.
    pub action_kind: ActionKind,
    /// Marker color.
    pub color: MarkerColor,
    /// Popup text, one `Label: value` line per field.
    pub popup_text: String,
}

/// One dated event on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Incident id.
    pub id: u64,
    /// Position on the time axis. For partial dates, January 1st.
    pub date: NaiveDate,
    /// Precision of `date`.
    pub date_kind: DateKind,
    /// Date as shown to users.
    pub date_label: String,
    /// City, used as the vertical axis.
    pub city: Option<String>,
    /// Action type, verbatim.
    pub action_type: Option<String>,
    /// Marker color.
    pub color: MarkerColor,
    /// Hover text, one `Label: value` line per field.
    pub hover_text: String,
}

/// Where a map should be centered and which area it should show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFrame {
    /// Center point.
    pub center: LatLon,
    /// South-west corner of the area to fit.
    pub south_west: LatLon,
    /// North-east corner of the area to fit.
    pub north_east: LatLon,
}

/// A toggleable group of markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGroup {
    /// Display name.
    pub name: String,
    /// Whether the group is shown before the user toggles it.
    pub visible: bool,
    /// Ids of the incidents in the group.
    pub incident_ids: Vec<u64>,
}

/// The markers for one year of the animated timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationFrame {
    /// Year shown in this frame.
    pub year: i32,
    /// Markers for incidents of that year.
    pub points: Vec<MapPoint>,
}
