//! Admin-1 boundary resolution via the geoBoundaries API.
//!
//! geoBoundaries answers a metadata request per country/level with a JSON
//! document pointing at downloadable geometry layers. We use the
//! simplified layer, which is small enough to fetch per session. API docs:
//! <https://www.geoboundaries.org/api.html>

use conflict_map_boundary_models::{AdminLevel, BoundaryLayer, Crs};

use crate::{BoundaryError, fetch, normalize};

/// geoBoundaries current-release metadata endpoint (open license tier).
pub const GEOBOUNDARIES_API_URL: &str = "https://www.geoboundaries.org/api/current/gbOpen";

/// Metadata field holding the simplified geometry download URL.
const GEOMETRY_URL_FIELD: &str = "simplifiedGeometryGeoJSON";

/// Feature property holding the region name.
const NAME_PROPERTY: &str = "shapeName";

/// Feature property holding the region's ISO code, when assigned.
const KEY_PROPERTY: &str = "shapeISO";

/// Resolves the admin-1 boundary layer for a country.
///
/// Queries the metadata endpoint, follows the simplified geometry URL,
/// and normalizes the features into a sorted region set.
///
/// # Errors
///
/// Returns [`BoundaryError::ServiceUnavailable`] on a non-success
/// metadata response, and [`BoundaryError::DataMissing`] when the
/// geometry URL field is absent or the layer contains no usable regions.
#[allow(clippy::future_not_send)]
pub async fn resolve(
    client: &reqwest::Client,
    base_url: &str,
    iso3: &str,
) -> Result<BoundaryLayer, BoundaryError> {
    let metadata_url = format!("{base_url}/{iso3}/ADM1/");
    let metadata = fetch::get_json(client, &metadata_url, "geoBoundaries").await?;

    let geometry_url = geometry_url(&metadata, iso3)?;
    log::info!("Fetching admin-1 geometry for {iso3}");
    let geometry = fetch::get_json(client, geometry_url, "geoBoundaries geometry").await?;

    let features = geometry
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| BoundaryError::DataMissing {
            message: format!("no features array in admin-1 geometry for {iso3}"),
        })?;

    let regions = normalize::normalize_features(features, NAME_PROPERTY, Some(KEY_PROPERTY));
    if regions.is_empty() {
        return Err(BoundaryError::DataMissing {
            message: format!("admin-1 layer for {iso3} contains no usable regions"),
        });
    }

    log::info!(
        "Resolved {} admin-1 regions for {iso3} from {} features",
        regions.len(),
        features.len()
    );

    Ok(BoundaryLayer::new(
        iso3,
        AdminLevel::Admin1,
        Crs::Epsg4326,
        regions,
    ))
}

/// Extracts the simplified geometry URL from a metadata document.
///
/// # Errors
///
/// Returns [`BoundaryError::DataMissing`] if the field is absent or empty.
pub fn geometry_url<'a>(
    metadata: &'a serde_json::Value,
    iso3: &str,
) -> Result<&'a str, BoundaryError> {
    metadata
        .get(GEOMETRY_URL_FIELD)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BoundaryError::DataMissing {
            message: format!("no {GEOMETRY_URL_FIELD} field in geoBoundaries metadata for {iso3}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_geometry_url() {
        let metadata = serde_json::json!({
            "boundaryISO": "SDN",
            "simplifiedGeometryGeoJSON": "https://example.org/SDN-ADM1-simplified.geojson"
        });

        let url = geometry_url(&metadata, "SDN").unwrap();
        assert_eq!(url, "https://example.org/SDN-ADM1-simplified.geojson");
    }

    #[test]
    fn missing_geometry_url_is_data_missing() {
        let metadata = serde_json::json!({ "boundaryISO": "SDN" });
        let err = geometry_url(&metadata, "SDN").unwrap_err();
        assert!(matches!(err, BoundaryError::DataMissing { .. }));
    }

    #[test]
    fn empty_geometry_url_is_data_missing() {
        let metadata = serde_json::json!({ "simplifiedGeometryGeoJSON": "" });
        assert!(geometry_url(&metadata, "SDN").is_err());
    }
}
