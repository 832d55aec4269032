#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Presentation adapters.
//!
//! Maps clipped events and region aggregates to the renderable forms the
//! hosting map/chart widgets consume: classified choropleth regions,
//! fatality-weighted heat points, H3 density cells, and two-color event
//! markers. Actual rendering belongs to the host.

pub mod choropleth;
pub mod classify;
pub mod density;

use conflict_map_event_models::ConflictEvent;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Marker color tag: binary fatal/non-fatal rule.
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
pub enum MarkerColor {
    /// The event reported at least one fatality.
    Fatal,
    /// The event reported no fatalities.
    NonFatal,
}

impl MarkerColor {
    /// CSS color used by the map widget for this tag.
    #[must_use]
    pub const fn css_color(self) -> &'static str {
        match self {
            Self::Fatal => "red",
            Self::NonFatal => "green",
        }
    }
}

/// A renderable point marker for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Latitude in WGS84 degrees.
    pub lat: f64,
    /// Longitude in WGS84 degrees.
    pub lon: f64,
    /// Binary color tag.
    pub color: MarkerColor,
    /// Popup label text.
    pub label: String,
}

/// A weighted point for heatmap rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPoint {
    /// Latitude in WGS84 degrees.
    pub lat: f64,
    /// Longitude in WGS84 degrees.
    pub lon: f64,
    /// Heat weight (reported fatalities).
    pub weight: f64,
}

/// Maps events to point markers.
///
/// Exactly two colors: red for events with fatalities, green otherwise.
#[must_use]
pub fn to_markers(events: &[ConflictEvent]) -> Vec<Marker> {
    events
        .iter()
        .map(|event| {
            let color = if event.fatalities > 0 {
                MarkerColor::Fatal
            } else {
                MarkerColor::NonFatal
            };
            Marker {
                lat: event.latitude,
                lon: event.longitude,
                color,
                label: format!("Fatalities: {}", event.fatalities),
            }
        })
        .collect()
}

/// Maps events to fatality-weighted heat points.
#[must_use]
pub fn to_heat_points(events: &[ConflictEvent]) -> Vec<HeatPoint> {
    events
        .iter()
        .map(|event| HeatPoint {
            lat: event.latitude,
            lon: event.longitude,
            weight: f64::from(event.fatalities),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn test_event(id: &str, lng: f64, lat: f64, fatalities: u32) -> ConflictEvent {
    ConflictEvent {
        id: id.to_string(),
        event_date: None,
        year: None,
        month: None,
        day: None,
        event_type: None,
        actor1: None,
        actor2: None,
        interaction: None,
        country: "Testland".to_string(),
        iso3: "TST".to_string(),
        admin1: None,
        admin2: None,
        admin3: None,
        location: None,
        fatalities,
        latitude: lat,
        longitude: lng,
        geo_precision: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_color_is_binary() {
        let markers = to_markers(&[
            test_event("A", 32.5, 15.5, 3),
            test_event("B", 32.6, 15.6, 0),
        ]);

        assert_eq!(markers[0].color, MarkerColor::Fatal);
        assert_eq!(markers[0].color.css_color(), "red");
        assert_eq!(markers[0].label, "Fatalities: 3");
        assert_eq!(markers[1].color, MarkerColor::NonFatal);
        assert_eq!(markers[1].color.css_color(), "green");
    }

    #[test]
    fn heat_points_weight_by_fatalities() {
        let points = to_heat_points(&[test_event("A", 32.5, 15.5, 7)]);
        assert!((points[0].weight - 7.0).abs() < f64::EPSILON);
        assert!((points[0].lat - 15.5).abs() < f64::EPSILON);
        assert!((points[0].lon - 32.5).abs() < f64::EPSILON);
    }
}
