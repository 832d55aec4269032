#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary layer and region geometry types.
//!
//! A [`BoundaryLayer`] is the output of boundary resolution: one or more
//! administrative region polygons tagged with a coordinate reference
//! system. Regions are kept sorted by key so repeated runs of the spatial
//! join and aggregation stages are reproducible.

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative level of a boundary layer.
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
pub enum AdminLevel {
    /// Level 0: the national boundary, a single polygon per country
    National,
    /// Level 1: first-level subdivisions (states/provinces)
    Admin1,
}

/// Coordinate reference system tag carried by every boundary layer.
///
/// All event points are WGS84, so every layer must be [`Crs::Epsg4326`]
/// before any spatial comparison. The resolver guarantees this; the
/// spatial index treats anything else as a precondition violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Crs {
    /// WGS84 geographic coordinates (EPSG:4326).
    Epsg4326,
    /// Any other reference system, identified by its authority code.
    Other(String),
}

impl Crs {
    /// Returns `true` if this is the WGS84 reference system.
    #[must_use]
    pub const fn is_wgs84(&self) -> bool {
        matches!(self, Self::Epsg4326)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Epsg4326 => write!(f, "EPSG:4326"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

/// One administrative region: a stable key, a display name, and its
/// polygon geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    /// Stable region key used for joins and aggregation (ISO3 for national
    /// layers, the boundary service's region code for admin-1).
    pub key: String,
    /// Human-readable region name.
    pub name: String,
    /// Region geometry. Single polygons are stored as one-part
    /// multi-polygons.
    pub geometry: MultiPolygon<f64>,
}

/// A resolved set of boundary regions for one country and admin level.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayer {
    /// ISO 3166-1 alpha-3 code of the country this layer covers.
    pub iso3: String,
    /// Administrative level of the regions.
    pub level: AdminLevel,
    /// Coordinate reference system of all region geometries.
    pub crs: Crs,
    /// Regions sorted by key ascending.
    regions: Vec<RegionBoundary>,
}

impl BoundaryLayer {
    /// Creates a layer, sorting regions by key so downstream ordering is
    /// stable regardless of the order the source returned them in.
    #[must_use]
    pub fn new(
        iso3: impl Into<String>,
        level: AdminLevel,
        crs: Crs,
        mut regions: Vec<RegionBoundary>,
    ) -> Self {
        regions.sort_by(|a, b| a.key.cmp(&b.key));
        Self {
            iso3: iso3.into(),
            level,
            crs,
            regions,
        }
    }

    /// Returns the regions, sorted by key ascending.
    #[must_use]
    pub fn regions(&self) -> &[RegionBoundary] {
        &self.regions
    }

    /// Returns the region keys, sorted ascending.
    #[must_use]
    pub fn region_keys(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.key.as_str()).collect()
    }

    /// Returns `true` if the layer contains no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn region(key: &str) -> RegionBoundary {
        RegionBoundary {
            key: key.to_string(),
            name: key.to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
            ]]),
        }
    }

    #[test]
    fn regions_sorted_by_key() {
        let layer = BoundaryLayer::new(
            "SDN",
            AdminLevel::Admin1,
            Crs::Epsg4326,
            vec![region("South"), region("North"), region("East")],
        );

        assert_eq!(layer.region_keys(), vec!["East", "North", "South"]);
    }

    #[test]
    fn crs_display_and_check() {
        assert_eq!(Crs::Epsg4326.to_string(), "EPSG:4326");
        assert!(Crs::Epsg4326.is_wgs84());
        assert!(!Crs::Other("EPSG:3857".to_string()).is_wgs84());
    }
}
