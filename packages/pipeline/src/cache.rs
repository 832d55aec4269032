//! Explicit per-session caches.
//!
//! Replaces decorator-style memoization with keyed components the
//! pipeline owns outright: "not present" always means recompute, and both
//! caches are cleared when the selected country changes. Nothing here
//! persists beyond the session.

use std::collections::HashMap;

use conflict_map_acled::DateWindow;
use conflict_map_boundary_models::{AdminLevel, BoundaryLayer};

use crate::ConflictSnapshot;

/// Cache key for fetched event snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FetchKey {
    iso3: String,
    window: DateWindow,
}

/// Caches clipped event snapshots by country and date window.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<FetchKey, ConflictSnapshot>,
}

impl FetchCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached snapshot.
    #[must_use]
    pub fn get(&self, iso3: &str, window: &DateWindow) -> Option<&ConflictSnapshot> {
        self.entries.get(&FetchKey {
            iso3: iso3.to_string(),
            window: *window,
        })
    }

    /// Stores a snapshot.
    pub fn insert(&mut self, snapshot: ConflictSnapshot) {
        self.entries.insert(
            FetchKey {
                iso3: snapshot.iso3.clone(),
                window: snapshot.window,
            },
            snapshot,
        );
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Caches resolved boundary layers by country and admin level.
#[derive(Debug, Default)]
pub struct BoundaryCache {
    entries: HashMap<(String, AdminLevel), BoundaryLayer>,
}

impl BoundaryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cached layer.
    #[must_use]
    pub fn get(&self, iso3: &str, level: AdminLevel) -> Option<&BoundaryLayer> {
        self.entries.get(&(iso3.to_string(), level))
    }

    /// Stores a layer.
    pub fn insert(&mut self, layer: BoundaryLayer) {
        self.entries
            .insert((layer.iso3.clone(), layer.level), layer);
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use conflict_map_boundary_models::Crs;

    use super::*;

    fn window() -> DateWindow {
        DateWindow {
            start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
        }
    }

    #[test]
    fn fetch_cache_misses_on_different_window() {
        let mut cache = FetchCache::new();
        cache.insert(ConflictSnapshot {
            iso3: "SDN".to_string(),
            window: window(),
            events: vec![],
            map_center: (15.0, 30.0),
        });

        assert!(cache.get("SDN", &window()).is_some());

        let other = DateWindow {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
        };
        assert!(cache.get("SDN", &other).is_none());
        assert!(cache.get("TCD", &window()).is_none());
    }

    #[test]
    fn caches_clear_completely() {
        let mut fetch_cache = FetchCache::new();
        fetch_cache.insert(ConflictSnapshot {
            iso3: "SDN".to_string(),
            window: window(),
            events: vec![],
            map_center: (15.0, 30.0),
        });
        fetch_cache.clear();
        assert!(fetch_cache.get("SDN", &window()).is_none());

        let mut boundary_cache = BoundaryCache::new();
        boundary_cache.insert(BoundaryLayer::new(
            "SDN",
            AdminLevel::National,
            Crs::Epsg4326,
            vec![],
        ));
        assert!(boundary_cache.get("SDN", AdminLevel::National).is_some());
        boundary_cache.clear();
        assert!(boundary_cache.get("SDN", AdminLevel::National).is_none());
    }
}
