//! Field coercion helpers for raw ACLED records.
//!
//! The ACLED API serializes nearly everything as strings, including
//! numeric fields like `fatalities` and the coordinates. These helpers
//! accept either representation.

use chrono::NaiveDate;

/// Parses an ACLED event date (`YYYY-MM-DD`).
#[must_use]
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Extracts a trimmed, non-empty string field.
#[must_use]
pub fn json_str(value: Option<&serde_json::Value>) -> Option<String> {
    value
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerces a field to `f64`, accepting both JSON numbers and numeric
/// strings.
#[must_use]
pub fn json_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerces a field to `u32`, accepting both JSON numbers and numeric
/// strings. Negative values are rejected.
#[must_use]
pub fn json_u32(value: Option<&serde_json::Value>) -> Option<u32> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
