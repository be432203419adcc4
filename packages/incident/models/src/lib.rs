#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical incident types and the action-type color taxonomy.
//!
//! This crate defines the validated [`Incident`] record shared by every
//! other crate in the violence-map workspace, together with the fixed
//! [`ActionKind`] to [`MarkerColor`] mapping and the static [`LEGEND`]
//! table that rendering layers build their own legend markup from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Southern/northern latitude limit in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Western/eastern longitude limit in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Returns `true` if `value` is a finite latitude within `[-90, 90]`.
#[must_use]
pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&value)
}

/// Returns `true` if `value` is a finite longitude within `[-180, 180]`.
#[must_use]
pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&value)
}

/// Known kinds of action taken against a victim.
///
/// The dataset stores the action type as free text. Classification only
/// drives marker coloring; the literal text is kept on the [`Incident`]
/// and is what filters match against.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    /// The victim was killed.
    Homicide,
    /// An attempt on the victim's life failed.
    AttemptedHomicide,
    /// The victim received a death threat.
    Threat,
    /// Any action text outside the known set.
    Other,
}

impl ActionKind {
    /// Classifies free action-type text.
    ///
    /// Recognizes the dataset's Portuguese labels and their English names,
    /// trimmed and case-insensitive. Everything else is [`Self::Other`].
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "assassinato" | "homicide" => Self::Homicide,
            "tentativa de assassinato" | "attempted homicide" => Self::AttemptedHomicide,
            "ameaça de assassinato" | "threat" => Self::Threat,
            _ => Self::Other,
        }
    }

    /// Returns the fixed marker color for this kind.
    #[must_use]
    pub const fn color(self) -> MarkerColor {
        match self {
            Self::Homicide => MarkerColor::Red,
            Self::AttemptedHomicide => MarkerColor::Green,
            Self::Threat => MarkerColor::Blue,
            Self::Other => MarkerColor::Gray,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Homicide,
            Self::AttemptedHomicide,
            Self::Threat,
            Self::Other,
        ]
    }
}

/// Marker color used by map and timeline renderers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarkerColor {
    /// Homicides.
    Red,
    /// Attempted homicides.
    Green,
    /// Threats.
    Blue,
    /// Unrecognized or missing action types.
    Gray,
}

/// Maps optional action-type text to its marker color.
///
/// Missing text is treated like any unrecognized value.
#[must_use]
pub fn color_for_action(action_type: Option<&str>) -> MarkerColor {
    action_type.map_or(ActionKind::Other, ActionKind::classify).color()
}

/// One row of the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// The action kind this row describes.
    pub kind: ActionKind,
    /// Marker color for the kind.
    pub color: MarkerColor,
    /// Human-readable label.
    pub label: &'static str,
}

/// Legend rows for the known action kinds, in display order.
///
/// Unrecognized action types are drawn gray but have no legend row.
pub const LEGEND: &[LegendEntry] = &[
    LegendEntry {
        kind: ActionKind::Homicide,
        color: MarkerColor::Red,
        label: "Homicide",
    },
    LegendEntry {
        kind: ActionKind::AttemptedHomicide,
        color: MarkerColor::Green,
        label: "Attempted homicide",
    },
    LegendEntry {
        kind: ActionKind::Threat,
        color: MarkerColor::Blue,
        label: "Threat",
    },
];

/// A month or day field as recorded in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum DateComponent {
    /// A numeric value was recorded.
    Known(u32),
    /// The source explicitly marked the value as not recorded, or recorded
    /// text that is not a number.
    Unknown,
    /// The cell was empty.
    Absent,
}

/// How precisely an incident's date is known.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DateKind {
    /// Day, month, and year form a valid calendar date.
    Full,
    /// Only the year is known.
    Partial,
    /// Not even the year is known.
    Unknown,
}

/// A best-effort date reconstructed from separate year/month/day fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDate {
    /// Precision of the date.
    pub kind: DateKind,
    /// Label shown to users (`"15/6/2015"`, `"2015"`, or `"date unknown"`).
    pub label: String,
    /// Date used for chronological ordering. For partial dates this is
    /// January 1st of the year and must never be presented as exact.
    pub sortable: Option<NaiveDate>,
}

/// Label used when the year cannot be resolved.
pub const UNKNOWN_DATE_LABEL: &str = "date unknown";

impl ResolvedDate {
    /// A date with no usable year.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            kind: DateKind::Unknown,
            label: UNKNOWN_DATE_LABEL.to_string(),
            sortable: None,
        }
    }

    /// A date known only to year granularity.
    #[must_use]
    pub fn partial(year: i32) -> Self {
        Self {
            kind: DateKind::Partial,
            label: year.to_string(),
            sortable: NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }

    /// A full calendar date.
    #[must_use]
    pub fn full(date: NaiveDate, day: u32, month: u32, year: i32) -> Self {
        Self {
            kind: DateKind::Full,
            label: format!("{day}/{month}/{year}"),
            sortable: Some(date),
        }
    }
}

/// A validated political-violence incident.
///
/// Every incident in a loaded dataset has in-range coordinates and a year.
/// All descriptive fields are optional and kept verbatim from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Row ordinal, stable within one load.
    pub id: u64,
    /// Latitude in degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    pub longitude: f64,
    /// Year the incident happened.
    pub year: i32,
    /// Month as recorded.
    pub month: DateComponent,
    /// Day as recorded.
    pub day: DateComponent,
    /// Date reconstructed from year/month/day.
    pub date: ResolvedDate,
    /// Victim's civil or social name.
    pub victim_name: Option<String>,
    /// Free-text account of the incident.
    pub description: Option<String>,
    /// Action taken against the victim, verbatim.
    pub action_type: Option<String>,
    /// Victim's gender, verbatim.
    pub victim_gender: Option<String>,
    /// Victim's ethnicity, verbatim.
    pub victim_ethnicity: Option<String>,
    /// Victim's political affiliation or group.
    pub affiliation: Option<String>,
    /// City where the incident happened.
    pub city: Option<String>,
    /// Dispute the incident is tied to.
    pub dispute: Option<String>,
    /// Primary instrument used.
    pub instrument: Option<String>,
}

impl Incident {
    /// Returns the classified action kind.
    #[must_use]
    pub fn action_kind(&self) -> ActionKind {
        self.action_type
            .as_deref()
            .map_or(ActionKind::Other, ActionKind::classify)
    }

    /// Returns the marker color for this incident's action type.
    #[must_use]
    pub fn marker_color(&self) -> MarkerColor {
        color_for_action(self.action_type.as_deref())
    }
}
