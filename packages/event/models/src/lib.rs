#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical conflict event types.
//!
//! This crate defines the normalized event schema that the ACLED source
//! produces and every downstream stage (spatial attribution, aggregation,
//! presentation) consumes. Events are created fresh per fetch and never
//! mutated in place.

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// ACLED geographic precision code, from 1 (exact) to 3 (regional).
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoPrecision {
    /// Level 1: coordinates refer to the exact reported location
    Exact = 1,
    /// Level 2: coordinates refer to a nearby town or part of a region
    Approximate = 2,
    /// Level 3: coordinates refer to a provincial capital or larger region
    Regional = 3,
}

impl GeoPrecision {
    /// Returns the numeric value of this precision code.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a precision code from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-3.
    pub const fn from_value(value: u8) -> Result<Self, InvalidPrecisionError> {
        match value {
            1 => Ok(Self::Exact),
            2 => Ok(Self::Approximate),
            3 => Ok(Self::Regional),
            _ => Err(InvalidPrecisionError { value }),
        }
    }
}

/// Error returned when attempting to create a [`GeoPrecision`] from an
/// invalid numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPrecisionError {
    /// The invalid precision value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidPrecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid geo precision {}: expected 1-3", self.value)
    }
}

impl std::error::Error for InvalidPrecisionError {}

/// A conflict event normalized to the canonical schema.
///
/// Produced by the ACLED source after parsing and coercing the raw API
/// payload. The date fields stay `None` when the source record carries a
/// missing or unparseable `event_date`; such events survive normalization
/// and are only excluded later by date-window filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEvent {
    /// ACLED event identifier (`event_id_cnty`). Unique per country dataset,
    /// but duplicates across pages are possible and are not merged.
    pub id: String,
    /// When the event occurred. `None` when the source date was missing or
    /// unparseable.
    pub event_date: Option<NaiveDate>,
    /// Calendar year of the event, derived from `event_date`.
    pub year: Option<i32>,
    /// Calendar month (1-12), derived from `event_date`.
    pub month: Option<u32>,
    /// Day of month (1-31), derived from `event_date`.
    pub day: Option<u32>,
    /// ACLED event type (e.g., "Battles", "Protests").
    pub event_type: Option<String>,
    /// Primary actor involved in the event.
    pub actor1: Option<String>,
    /// Secondary actor, if any.
    pub actor2: Option<String>,
    /// ACLED actor interaction code (e.g., "60").
    pub interaction: Option<String>,
    /// Country name as reported by ACLED.
    pub country: String,
    /// ISO 3166-1 alpha-3 country code, the spatial join key.
    pub iso3: String,
    /// First-level administrative division (state/province).
    pub admin1: Option<String>,
    /// Second-level administrative division.
    pub admin2: Option<String>,
    /// Third-level administrative division.
    pub admin3: Option<String>,
    /// Free-text location name.
    pub location: Option<String>,
    /// Reported fatalities. Missing values default to 0.
    pub fatalities: u32,
    /// Latitude in WGS84 degrees, guaranteed within [-90, 90].
    pub latitude: f64,
    /// Longitude in WGS84 degrees, guaranteed within [-180, 180].
    pub longitude: f64,
    /// Geographic precision of the coordinates, if reported.
    pub geo_precision: Option<GeoPrecision>,
}

impl ConflictEvent {
    /// Sets the date fields from a parsed calendar date.
    pub fn set_event_date(&mut self, date: NaiveDate) {
        self.event_date = Some(date);
        self.year = Some(date.year());
        self.month = Some(date.month());
        self.day = Some(date.day());
    }
}

/// A conflict event paired with the boundary region it falls inside.
///
/// Produced by the spatial clip/join stage. The `region_key` is the
/// canonical key from the boundary layer (ISO3 for national clips, the
/// admin-1 region code for subnational joins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedEvent {
    /// The underlying normalized event.
    pub event: ConflictEvent,
    /// Key of the boundary region containing the event point.
    pub region_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_from_value_roundtrip() {
        for v in 1..=3u8 {
            let precision = GeoPrecision::from_value(v).unwrap();
            assert_eq!(precision.value(), v);
        }
        assert!(GeoPrecision::from_value(0).is_err());
        assert!(GeoPrecision::from_value(4).is_err());
    }

    #[test]
    fn set_event_date_fills_derived_fields() {
        let mut event = ConflictEvent {
            id: "SDN1".to_string(),
            event_date: None,
            year: None,
            month: None,
            day: None,
            event_type: None,
            actor1: None,
            actor2: None,
            interaction: None,
            country: "Sudan".to_string(),
            iso3: "SDN".to_string(),
            admin1: None,
            admin2: None,
            admin3: None,
            location: None,
            fatalities: 0,
            latitude: 15.5,
            longitude: 32.5,
            geo_precision: None,
        };

        event.set_event_date(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());

        assert_eq!(event.year, Some(2025));
        assert_eq!(event.month, Some(3));
        assert_eq!(event.day, Some(14));
    }
}
