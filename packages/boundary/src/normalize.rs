//! Normalizes raw `GeoJSON` features into [`RegionBoundary`] values.
//!
//! Skips features with missing names or empty geometries, accepting both
//! `Polygon` and `MultiPolygon` geometry types.

use conflict_map_boundary_models::RegionBoundary;
use geo::MultiPolygon;
use geojson::GeoJson;

/// Normalizes a list of raw `GeoJSON` features into region boundaries.
///
/// The region name is read from `name_property`; the stable key from
/// `key_property`, falling back to the name when the key field is absent
/// or empty.
#[must_use]
pub fn normalize_features(
    features: &[serde_json::Value],
    name_property: &str,
    key_property: Option<&str>,
) -> Vec<RegionBoundary> {
    features
        .iter()
        .filter_map(|feature| normalize_feature(feature, name_property, key_property))
        .collect()
}

/// Normalizes a single `GeoJSON` feature.
fn normalize_feature(
    feature: &serde_json::Value,
    name_property: &str,
    key_property: Option<&str>,
) -> Option<RegionBoundary> {
    let props = feature.get("properties")?;

    let name = property_string(props, name_property)?;
    let key = key_property
        .and_then(|k| property_string(props, k))
        .unwrap_or_else(|| name.clone());

    let geometry = feature.get("geometry")?;
    if geometry.is_null() {
        log::warn!("Skipping region {name}: null geometry");
        return None;
    }

    let Some(multi_polygon) = parse_multipolygon(geometry) else {
        log::warn!("Skipping region {name}: unsupported or unparseable geometry");
        return None;
    };

    Some(RegionBoundary {
        key,
        name,
        geometry: multi_polygon,
    })
}

/// Extracts a trimmed, non-empty string property.
fn property_string(props: &serde_json::Value, key: &str) -> Option<String> {
    props
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses a `GeoJSON` geometry object into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
#[must_use]
pub fn parse_multipolygon(geometry: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    let geojson: GeoJson = geometry.to_string().parse().ok()?;
    if let GeoJson::Geometry(geom) = geojson {
        let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
        match geo_geom {
            geo::Geometry::MultiPolygon(mp) => Some(mp),
            geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
            _ => None,
        }
    } else {
        None
    }
}
