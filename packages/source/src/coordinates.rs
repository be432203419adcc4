//! Heuristic repair of malformed coordinate values.
//!
//! Source spreadsheets record coordinates as free text: decimal commas,
//! stray symbols, several merged decimal separators, and values typed
//! without any decimal point at all. [`normalize_coordinate`] recovers a
//! degree value from those where it can. It is a recovery step, not a
//! validator: the repository range-checks the result afterwards.

use serde_json::Value;

/// Magnitude above which a value is assumed to be missing its decimal point.
///
/// Applied to latitude and longitude alike.
pub const SCALE_THRESHOLD: f64 = 180.0;

/// Divisor applied to values above [`SCALE_THRESHOLD`].
pub const SCALE_DIVISOR: f64 = 100_000.0;

/// Normalizes a raw coordinate field.
///
/// Numbers pass through unchanged. Strings go through
/// [`normalize_coordinate_str`]. Any other JSON value, and any non-finite
/// number, is invalid.
#[must_use]
pub fn normalize_coordinate(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => normalize_coordinate_str(s),
        _ => None,
    }
}

/// Repairs a textual coordinate into a degree value.
///
/// 1. Decimal commas become periods.
/// 2. Everything but digits, `.` and `-` is dropped.
/// 3. Only the first `.` is kept as the decimal point; the digits after
///    any later `.` are appended to the fraction.
/// 4. The result is parsed; failure means invalid.
/// 5. Magnitudes above [`SCALE_THRESHOLD`] are divided by [`SCALE_DIVISOR`].
#[must_use]
pub fn normalize_coordinate_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let collapsed = collapse_decimal_points(&cleaned);

    let value = collapsed.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    if value.abs() > SCALE_THRESHOLD {
        return Some(value / SCALE_DIVISOR);
    }

    Some(value)
}

fn collapse_decimal_points(cleaned: &str) -> String {
    let mut parts = cleaned.split('.');
    let integer = parts.next().unwrap_or_default();
    let fraction: Vec<&str> = parts.collect();

    if fraction.len() <= 1 {
        return cleaned.to_string();
    }

    format!("{integer}.{}", fraction.concat())
}
