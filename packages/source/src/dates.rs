//! Date reconstruction from separate year, month, and day fields.
//!
//! The dataset records dates as three cells, any of which may be blank or
//! carry an explicit "not recorded" marker. Resolution never fails: the
//! date degrades to year granularity, or to unknown when there is no year.

use chrono::NaiveDate;
use serde_json::Value;
use violence_map_incident_models::{DateComponent, ResolvedDate};

/// Parses a year cell.
///
/// Accepts integer text and integral float text (`"2015.0"`, as written by
/// spreadsheet exports), or a JSON number. Anything else has no year, and
/// so does a year outside the calendar range [`NaiveDate`] can represent.
#[must_use]
pub fn parse_year(raw: &Value) -> Option<i32> {
    let year = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => parse_year_str(s),
        _ => None,
    };
    year.filter(|&y| NaiveDate::from_ymd_opt(y, 1, 1).is_some())
}

fn parse_year_str(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(integral)
        .and_then(|v| i32::try_from(v).ok())
}

#[allow(clippy::cast_possible_truncation)]
fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then(|| value as i64)
}

/// Returns `true` if `raw` is one of the "not recorded" markers.
///
/// Matching is trimmed and case-insensitive.
#[must_use]
pub fn is_unknown_marker(raw: &str, unknown_markers: &[String]) -> bool {
    let trimmed = raw.trim();
    unknown_markers
        .iter()
        .any(|marker| marker.eq_ignore_ascii_case(trimmed))
}

/// Parses a month or day cell.
///
/// Blank cells are [`DateComponent::Absent`]. Unknown markers and
/// non-numeric text are [`DateComponent::Unknown`].
#[must_use]
pub fn parse_component(raw: &Value, unknown_markers: &[String]) -> DateComponent {
    match raw {
        Value::Null => DateComponent::Absent,
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral).and_then(|v| u64::try_from(v).ok()))
            .and_then(|v| u32::try_from(v).ok())
            .map_or(DateComponent::Unknown, DateComponent::Known),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                DateComponent::Absent
            } else if is_unknown_marker(trimmed, unknown_markers) {
                DateComponent::Unknown
            } else {
                parse_year_str(trimmed)
                    .and_then(|v| u32::try_from(v).ok())
                    .map_or(DateComponent::Unknown, DateComponent::Known)
            }
        }
        _ => DateComponent::Unknown,
    }
}

/// Builds the best available date from its parts.
///
/// * No year: [`DateKind::Unknown`](violence_map_incident_models::DateKind::Unknown).
/// * Month or day not a number: year-only partial date.
/// * Day/month that do not form a calendar date (31/4): also partial.
/// * Otherwise a full date labeled `day/month/year`.
#[must_use]
pub fn resolve_date(year: Option<i32>, month: DateComponent, day: DateComponent) -> ResolvedDate {
    let Some(year) = year else {
        return ResolvedDate::unknown();
    };

    let (DateComponent::Known(month), DateComponent::Known(day)) = (month, day) else {
        return ResolvedDate::partial(year);
    };

    NaiveDate::from_ymd_opt(year, month, day).map_or_else(
        || {
            log::trace!("Invalid calendar date {day}/{month}/{year}, keeping year only");
            ResolvedDate::partial(year)
        },
        |date| ResolvedDate::full(date, day, month, year),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use violence_map_incident_models::DateKind;

    use super::*;

    fn markers() -> Vec<String> {
        vec!["SI".to_string(), "unknown".to_string()]
    }

    #[test]
    fn unknown_month_and_day_give_year_only() {
        let m = markers();
        let date = resolve_date(
            Some(2015),
            parse_component(&json!("unknown"), &m),
            parse_component(&json!("unknown"), &m),
        );
        assert_eq!(date.kind, DateKind::Partial);
        assert_eq!(date.label, "2015");
        assert_eq!(date.sortable, NaiveDate::from_ymd_opt(2015, 1, 1));
    }

    #[test]
    fn full_date_label_is_day_month_year() {
        let date = resolve_date(
            Some(2015),
            DateComponent::Known(6),
            DateComponent::Known(15),
        );
        assert_eq!(date.kind, DateKind::Full);
        assert_eq!(date.label, "15/6/2015");
        assert_eq!(date.sortable, NaiveDate::from_ymd_opt(2015, 6, 15));
    }

    #[test]
    fn leading_zeros_are_not_kept_in_label() {
        let m = markers();
        let date = resolve_date(
            Some(2015),
            parse_component(&json!("06"), &m),
            parse_component(&json!("05"), &m),
        );
        assert_eq!(date.label, "5/6/2015");
    }

    #[test]
    fn invalid_calendar_day_degrades_to_partial() {
        let date = resolve_date(
            Some(2019),
            DateComponent::Known(4),
            DateComponent::Known(31),
        );
        assert_eq!(date.kind, DateKind::Partial);
        assert_eq!(date.label, "2019");
        assert_eq!(date.sortable, NaiveDate::from_ymd_opt(2019, 1, 1));
    }

    #[test]
    fn missing_year_is_unknown() {
        let date = resolve_date(None, DateComponent::Known(1), DateComponent::Known(1));
        assert_eq!(date.kind, DateKind::Unknown);
        assert_eq!(date.label, "date unknown");
        assert!(date.sortable.is_none());
    }

    #[test]
    fn unknown_marker_is_case_insensitive() {
        let m = markers();
        assert_eq!(parse_component(&json!(" si "), &m), DateComponent::Unknown);
        assert_eq!(parse_component(&json!("UNKNOWN"), &m), DateComponent::Unknown);
    }

    #[test]
    fn blank_and_text_components() {
        let m = markers();
        assert_eq!(parse_component(&json!(""), &m), DateComponent::Absent);
        assert_eq!(parse_component(&Value::Null, &m), DateComponent::Absent);
        assert_eq!(parse_component(&json!("março"), &m), DateComponent::Unknown);
        assert_eq!(parse_component(&json!("3.0"), &m), DateComponent::Known(3));
        assert_eq!(parse_component(&json!(12), &m), DateComponent::Known(12));
    }

    #[test]
    fn blank_day_gives_partial_date() {
        let date = resolve_date(Some(2010), DateComponent::Known(3), DateComponent::Absent);
        assert_eq!(date.kind, DateKind::Partial);
    }

    #[test]
    fn parses_year_variants() {
        assert_eq!(parse_year(&json!("2015")), Some(2015));
        assert_eq!(parse_year(&json!(" 2015.0 ")), Some(2015));
        assert_eq!(parse_year(&json!(2003)), Some(2003));
        assert_eq!(parse_year(&json!(2003.0)), Some(2003));
        assert_eq!(parse_year(&json!("2015.5")), None);
        assert_eq!(parse_year(&json!("SI")), None);
        assert_eq!(parse_year(&json!("")), None);
        assert_eq!(parse_year(&Value::Null), None);
    }

    #[test]
    fn year_outside_calendar_range_is_not_a_year() {
        assert_eq!(parse_year(&json!("300000")), None);
        assert_eq!(parse_year(&json!(-300_000)), None);
        assert_eq!(parse_year(&json!("262000")), Some(262_000));
    }
}
