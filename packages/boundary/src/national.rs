//! National boundary lookup from the geo-countries reference dataset.
//!
//! The dataset is a single `GeoJSON` `FeatureCollection` of world country
//! polygons keyed by ISO 3166-1 alpha-3 code, published at
//! <https://github.com/datasets/geo-countries>.

use conflict_map_boundary_models::{AdminLevel, BoundaryLayer, Crs, RegionBoundary};

use crate::normalize::parse_multipolygon;
use crate::{BoundaryError, fetch};

/// Published geo-countries dataset URL.
pub const COUNTRIES_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";

/// Feature property holding the ISO3 code.
const ISO3_PROPERTY: &str = "ISO3166-1-Alpha-3";

/// Feature property holding the country name.
const NAME_PROPERTY: &str = "name";

/// Resolves the national (level 0) boundary for a country.
///
/// Fetches the world dataset and selects the feature whose ISO3 property
/// matches `iso3` exactly.
///
/// # Errors
///
/// Returns [`BoundaryError::UnknownCountry`] if no feature matches, and
/// [`BoundaryError::Conversion`] if the dataset or the matched geometry
/// cannot be parsed.
#[allow(clippy::future_not_send)]
pub async fn resolve(
    client: &reqwest::Client,
    url: &str,
    iso3: &str,
) -> Result<BoundaryLayer, BoundaryError> {
    let json = fetch::get_json(client, url, "geo-countries").await?;

    let features = json
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| BoundaryError::Conversion {
            message: "no features array in geo-countries dataset".to_string(),
        })?;

    let layer = select_country(features, iso3)?;
    log::info!("Resolved national boundary for {iso3}");
    Ok(layer)
}

/// Selects the country feature matching `iso3` and builds a single-region
/// layer from it.
///
/// # Errors
///
/// Returns [`BoundaryError::UnknownCountry`] if no feature carries the
/// requested ISO3 code, and [`BoundaryError::Conversion`] if the matched
/// feature has no usable polygon geometry.
pub fn select_country(
    features: &[serde_json::Value],
    iso3: &str,
) -> Result<BoundaryLayer, BoundaryError> {
    let feature = features
        .iter()
        .find(|f| {
            f.get("properties")
                .and_then(|p| p.get(ISO3_PROPERTY))
                .and_then(serde_json::Value::as_str)
                == Some(iso3)
        })
        .ok_or_else(|| BoundaryError::UnknownCountry {
            iso3: iso3.to_string(),
        })?;

    let name = feature
        .get("properties")
        .and_then(|p| p.get(NAME_PROPERTY))
        .and_then(serde_json::Value::as_str)
        .unwrap_or(iso3)
        .to_string();

    let geometry = feature
        .get("geometry")
        .and_then(parse_multipolygon)
        .ok_or_else(|| BoundaryError::Conversion {
            message: format!("country {iso3} has no usable polygon geometry"),
        })?;

    Ok(BoundaryLayer::new(
        iso3,
        AdminLevel::National,
        Crs::Epsg4326,
        vec![RegionBoundary {
            key: iso3.to_string(),
            name,
            geometry,
        }],
    ))
}
