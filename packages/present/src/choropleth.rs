//! Choropleth assembly: region aggregates + boundary geometry + classes.

use std::collections::BTreeMap;

use conflict_map_aggregate::RegionAggregate;
use conflict_map_boundary_models::BoundaryLayer;
use geo::MultiPolygon;

use crate::classify::{Classifier, class_for};

/// One renderable choropleth region.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethRegion {
    /// Canonical region key.
    pub region_key: String,
    /// Region geometry for shading.
    pub geometry: MultiPolygon<f64>,
    /// The classified value (fatalities sum).
    pub value: f64,
    /// Class index (0-based) into the classifier's breaks.
    pub class_index: usize,
}

/// Maps region aggregates onto the boundary layer's geometries with
/// classified shading values.
///
/// Regions are emitted in the layer's key order. Regions without an
/// aggregate entry (callers normally zero-fill upstream) get value 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_choropleth(
    aggregates: &[RegionAggregate],
    layer: &BoundaryLayer,
    classifier: &dyn Classifier,
    num_classes: usize,
) -> Vec<ChoroplethRegion> {
    let values_by_key: BTreeMap<&str, f64> = aggregates
        .iter()
        .map(|a| (a.region_key.as_str(), a.fatalities as f64))
        .collect();

    let values: Vec<f64> = layer
        .regions()
        .iter()
        .map(|region| {
            values_by_key
                .get(region.key.as_str())
                .copied()
                .unwrap_or(0.0)
        })
        .collect();

    let breaks = classifier.classify(&values, num_classes);
    log::debug!(
        "{} classification of {} region(s): breaks {breaks:?}",
        classifier.name(),
        values.len()
    );

    layer
        .regions()
        .iter()
        .zip(values)
        .map(|(region, value)| ChoroplethRegion {
            region_key: region.key.clone(),
            geometry: region.geometry.clone(),
            value,
            class_index: class_for(value, &breaks),
        })
        .collect()
}
