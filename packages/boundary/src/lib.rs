#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Country and admin-1 boundary resolution.
//!
//! Level 0 (national) polygons come from the geo-countries reference
//! dataset, keyed by exact ISO3 code. Level 1 (admin-1) polygon sets come
//! from the geoBoundaries API, which returns metadata pointing at a
//! simplified `GeoJSON` layer. Both upstream datasets are WGS84, so every
//! resolved layer is tagged [`Crs::Epsg4326`](conflict_map_boundary_models::Crs)
//! before it reaches any spatial operation.

pub mod admin1;
pub mod fetch;
pub mod national;
pub mod normalize;

use conflict_map_boundary_models::{AdminLevel, BoundaryLayer};
use geo::{Centroid as _, MultiPolygon};

/// Errors that can occur during boundary resolution.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// No country with the requested ISO3 code exists in the reference
    /// dataset.
    #[error("Unknown country: no boundary found for ISO3 code {iso3}")]
    UnknownCountry {
        /// The ISO3 code that failed to match.
        iso3: String,
    },

    /// The boundary service answered with a non-success response or kept
    /// failing after retries.
    #[error("Boundary service unavailable: {message}")]
    ServiceUnavailable {
        /// Description of what went wrong, including the country context.
        message: String,
    },

    /// The boundary service response lacks the expected geometry data.
    #[error("Boundary data missing: {message}")]
    DataMissing {
        /// Description of what was missing.
        message: String,
    },

    /// Geometry conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Resolves boundary layers from their upstream sources.
///
/// Endpoint URLs are overridable so tests can point the resolver at
/// fixtures.
pub struct BoundaryResolver {
    http: reqwest::Client,
    countries_url: String,
    geoboundaries_url: String,
}

impl BoundaryResolver {
    /// Creates a resolver against the production endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            countries_url: national::COUNTRIES_GEOJSON_URL.to_string(),
            geoboundaries_url: admin1::GEOBOUNDARIES_API_URL.to_string(),
        }
    }

    /// Creates a resolver against custom endpoints (used by tests).
    #[must_use]
    pub fn with_urls(
        countries_url: impl Into<String>,
        geoboundaries_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            countries_url: countries_url.into(),
            geoboundaries_url: geoboundaries_url.into(),
        }
    }

    /// Resolves the boundary layer for a country at the given admin level.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::UnknownCountry`] for an ISO3 code absent
    /// from the national reference dataset,
    /// [`BoundaryError::ServiceUnavailable`] when the admin-1 service
    /// answers with a non-success response, and
    /// [`BoundaryError::DataMissing`] when the expected geometry payload is
    /// absent.
    #[allow(clippy::future_not_send)]
    pub async fn resolve(
        &self,
        iso3: &str,
        level: AdminLevel,
    ) -> Result<BoundaryLayer, BoundaryError> {
        match level {
            AdminLevel::National => {
                national::resolve(&self.http, &self.countries_url, iso3).await
            }
            AdminLevel::Admin1 => {
                admin1::resolve(&self.http, &self.geoboundaries_url, iso3).await
            }
        }
    }
}

impl Default for BoundaryResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the map center `(lat, lon)` of a boundary layer as the
/// centroid of the combined region geometry.
///
/// Returns `None` for an empty layer.
#[must_use]
pub fn map_center(layer: &BoundaryLayer) -> Option<(f64, f64)> {
    let combined: MultiPolygon<f64> = MultiPolygon(
        layer
            .regions()
            .iter()
            .flat_map(|r| r.geometry.0.iter().cloned())
            .collect(),
    );

    combined.centroid().map(|p| (p.y(), p.x()))
}

#[cfg(test)]
mod tests {
    use conflict_map_boundary_models::{Crs, RegionBoundary};
    use geo::polygon;

    use super::*;

    #[test]
    fn map_center_is_centroid_of_regions() {
        let layer = BoundaryLayer::new(
            "TST",
            AdminLevel::National,
            Crs::Epsg4326,
            vec![RegionBoundary {
                key: "TST".to_string(),
                name: "Testland".to_string(),
                geometry: MultiPolygon(vec![polygon![
                    (x: 10.0, y: 20.0),
                    (x: 14.0, y: 20.0),
                    (x: 14.0, y: 24.0),
                    (x: 10.0, y: 24.0),
                ]]),
            }],
        );

        let (lat, lon) = map_center(&layer).unwrap();
        assert!((lat - 22.0).abs() < 1e-9);
        assert!((lon - 12.0).abs() < 1e-9);
    }

    #[test]
    fn map_center_of_empty_layer_is_none() {
        let layer = BoundaryLayer::new("TST", AdminLevel::Admin1, Crs::Epsg4326, vec![]);
        assert!(map_center(&layer).is_none());
    }
}
