#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for boundary attribution.
//!
//! Builds an R-tree over a boundary layer's region polygons and provides
//! the two point-in-polygon operations of the pipeline: [`clip`]
//! (keep-inside filtering against one boundary) and [`join`] (inner join
//! against a multi-region layer). Both require the layer to be in WGS84;
//! a different reference system is a precondition violation, not a
//! recoverable condition.

use std::collections::BTreeSet;

use conflict_map_boundary_models::BoundaryLayer;
use conflict_map_event_models::{AttributedEvent, ConflictEvent};
use geo::{BoundingRect as _, Intersects as _, MultiPolygon};
use rstar::{AABB, RTree, RTreeObject};

/// Errors that can occur building or querying the spatial index.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// The boundary layer is not in the event points' reference system.
    #[error("CRS mismatch: boundary layer is {crs}, expected EPSG:4326")]
    CrsMismatch {
        /// The reference system the layer carried.
        crs: String,
    },
}

/// A region polygon stored in the R-tree with its key.
#[derive(Debug)]
struct RegionEntry {
    key: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for RegionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over one boundary layer.
///
/// Constructed once per resolved layer and queried for every event point.
#[derive(Debug)]
pub struct BoundaryIndex {
    regions: RTree<RegionEntry>,
}

impl BoundaryIndex {
    /// Builds an R-tree index from a boundary layer.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::CrsMismatch`] if the layer is not WGS84.
    pub fn build(layer: &BoundaryLayer) -> Result<Self, SpatialError> {
        if !layer.crs.is_wgs84() {
            return Err(SpatialError::CrsMismatch {
                crs: layer.crs.to_string(),
            });
        }

        let entries: Vec<RegionEntry> = layer
            .regions()
            .iter()
            .map(|region| RegionEntry {
                key: region.key.clone(),
                envelope: compute_envelope(&region.geometry),
                polygon: region.geometry.clone(),
            })
            .collect();

        log::info!(
            "Built spatial index over {} region(s) for {}",
            entries.len(),
            layer.iso3
        );

        Ok(Self {
            regions: RTree::bulk_load(entries),
        })
    }

    /// Finds the region containing a point.
    ///
    /// A point on a shared edge can intersect more than one region; the
    /// lowest region key wins so repeated runs assign ties identically
    /// regardless of R-tree iteration order.
    #[must_use]
    pub fn locate(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.regions
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| entry.polygon.intersects(&point))
            .map(|entry| entry.key.as_str())
            .min()
    }

    /// Number of regions in the index.
    #[must_use]
    pub fn size(&self) -> usize {
        self.regions.size()
    }
}

/// Clips events against a boundary, keeping events whose point falls
/// inside it.
///
/// Output follows input order. An event id appears at most once in the
/// output even when the input carries duplicates or the boundary is
/// multi-part.
#[must_use]
pub fn clip(events: &[ConflictEvent], index: &BoundaryIndex) -> Vec<AttributedEvent> {
    let mut seen_ids: BTreeSet<&str> = BTreeSet::new();
    let mut attributed = Vec::new();

    for event in events {
        if seen_ids.contains(event.id.as_str()) {
            continue;
        }
        if let Some(region_key) = index.locate(event.longitude, event.latitude) {
            seen_ids.insert(&event.id);
            attributed.push(AttributedEvent {
                event: event.clone(),
                region_key: region_key.to_string(),
            });
        }
    }

    attributed
}

/// Joins events against a multi-region layer, pairing each event with the
/// region containing it.
///
/// Inner-join semantics: events matching no region are dropped. Shared-edge
/// ties resolve to the lowest region key (see [`BoundaryIndex::locate`]).
/// Output follows input order.
#[must_use]
pub fn join(events: &[ConflictEvent], index: &BoundaryIndex) -> Vec<AttributedEvent> {
    let mut attributed = Vec::new();

    for event in events {
        if let Some(region_key) = index.locate(event.longitude, event.latitude) {
            attributed.push(AttributedEvent {
                event: event.clone(),
                region_key: region_key.to_string(),
            });
        }
    }

    if attributed.len() < events.len() {
        log::info!(
            "Join matched {} of {} events to a region",
            attributed.len(),
            events.len()
        );
    }

    attributed
}

/// Computes the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
