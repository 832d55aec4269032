#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region and region-by-month fatality aggregation.
//!
//! Groups attributed events by their boundary region key (exact match, no
//! fuzzy matching) and sums fatalities. Regions present in the boundary
//! layer but with zero matching events still appear with sum 0, so the
//! presentation layer can render the full region set. Output ordering is
//! by region key ascending, so repeated runs are reproducible.
//!
//! Undated events count toward the per-region totals but are excluded
//! from the month matrix; the matrix tracks their fatalities separately
//! so the two aggregates reconcile.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use conflict_map_boundary_models::BoundaryLayer;
use conflict_map_event_models::AttributedEvent;
use serde::{Deserialize, Serialize};

/// Totals for one boundary region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAggregate {
    /// Canonical region key from the boundary layer.
    pub region_key: String,
    /// Number of events attributed to the region.
    pub events: u64,
    /// Sum of fatalities across those events.
    pub fatalities: u64,
}

/// Truncates a date to the first of its month.
#[must_use]
pub fn month_bucket(date: NaiveDate) -> NaiveDate {
    // from_ymd_opt(y, m, 1) is valid for any date's year/month
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Region totals, left-outer merged against the layer's region keys.
///
/// Every region of `layer` appears in the output, zero-filled when no
/// events matched it. Events attributed to a key absent from the layer
/// (possible only if caller mixes layers) are still counted under their
/// own key.
#[must_use]
pub fn aggregate_by_region(
    attributed: &[AttributedEvent],
    layer: &BoundaryLayer,
) -> Vec<RegionAggregate> {
    let mut totals: BTreeMap<String, (u64, u64)> = layer
        .region_keys()
        .into_iter()
        .map(|key| (key.to_string(), (0, 0)))
        .collect();

    for attributed_event in attributed {
        let entry = totals
            .entry(attributed_event.region_key.clone())
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u64::from(attributed_event.event.fatalities);
    }

    totals
        .into_iter()
        .map(|(region_key, (events, fatalities))| RegionAggregate {
            region_key,
            events,
            fatalities,
        })
        .collect()
}

/// Region × month fatality matrix.
///
/// Months are first-of-month dates, sorted ascending. Regions mirror the
/// boundary layer (zero-filled). `unparsed_fatalities` holds the
/// fatalities of undated events per region, which are excluded from the
/// month cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMonthMatrix {
    months: Vec<NaiveDate>,
    rows: BTreeMap<String, BTreeMap<NaiveDate, u64>>,
    unparsed: BTreeMap<String, u64>,
}

impl RegionMonthMatrix {
    /// The month buckets observed across all dated events, ascending.
    #[must_use]
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Region keys, ascending.
    #[must_use]
    pub fn region_keys(&self) -> Vec<&str> {
        self.rows.keys().map(String::as_str).collect()
    }

    /// Fatalities for one region and month bucket (0 when absent).
    #[must_use]
    pub fn fatalities(&self, region_key: &str, month: NaiveDate) -> u64 {
        self.rows
            .get(region_key)
            .and_then(|row| row.get(&month))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of a region's fatalities across all month buckets.
    ///
    /// Excludes undated events; add [`Self::unparsed_fatalities`] to
    /// reconcile with [`aggregate_by_region`].
    #[must_use]
    pub fn region_total(&self, region_key: &str) -> u64 {
        self.rows
            .get(region_key)
            .map_or(0, |row| row.values().sum())
    }

    /// Fatalities of undated events attributed to a region.
    #[must_use]
    pub fn unparsed_fatalities(&self, region_key: &str) -> u64 {
        self.unparsed.get(region_key).copied().unwrap_or(0)
    }
}

/// Builds the region × month fatality matrix.
#[must_use]
pub fn aggregate_by_region_and_month(
    attributed: &[AttributedEvent],
    layer: &BoundaryLayer,
) -> RegionMonthMatrix {
    let mut rows: BTreeMap<String, BTreeMap<NaiveDate, u64>> = layer
        .region_keys()
        .into_iter()
        .map(|key| (key.to_string(), BTreeMap::new()))
        .collect();
    let mut unparsed: BTreeMap<String, u64> = BTreeMap::new();
    let mut months: Vec<NaiveDate> = Vec::new();

    for attributed_event in attributed {
        let fatalities = u64::from(attributed_event.event.fatalities);
        let row = rows
            .entry(attributed_event.region_key.clone())
            .or_default();

        match attributed_event.event.event_date {
            Some(date) => {
                let bucket = month_bucket(date);
                *row.entry(bucket).or_insert(0) += fatalities;
                if !months.contains(&bucket) {
                    months.push(bucket);
                }
            }
            None => {
                *unparsed
                    .entry(attributed_event.region_key.clone())
                    .or_insert(0) += fatalities;
            }
        }
    }

    months.sort_unstable();

    RegionMonthMatrix {
        months,
        rows,
        unparsed,
    }
}

#[cfg(test)]
mod tests {
    use conflict_map_boundary_models::{AdminLevel, Crs, RegionBoundary};
    use conflict_map_event_models::ConflictEvent;
    use geo::{MultiPolygon, polygon};

    use super::*;

    fn layer(keys: &[&str]) -> BoundaryLayer {
        let regions = keys
            .iter()
            .map(|key| RegionBoundary {
                key: (*key).to_string(),
                name: (*key).to_string(),
                geometry: MultiPolygon(vec![polygon![
                    (x: 0.0, y: 0.0),
                    (x: 1.0, y: 0.0),
                    (x: 1.0, y: 1.0),
                    (x: 0.0, y: 1.0),
                ]]),
            })
            .collect();
        BoundaryLayer::new("TST", AdminLevel::Admin1, Crs::Epsg4326, regions)
    }

    fn attributed(id: &str, region: &str, fatalities: u32, date: Option<&str>) -> AttributedEvent {
        let mut event = ConflictEvent {
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
            latitude: 0.5,
            longitude: 0.5,
            geo_precision: None,
        };
        if let Some(s) = date {
            event.set_event_date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap());
        }
        AttributedEvent {
            event,
            region_key: region.to_string(),
        }
    }

    #[test]
    fn month_bucket_truncates_to_first_of_month() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            month_bucket(date),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn north_south_scenario() {
        // Unmatched events never reach the aggregator (dropped by the join)
        let input = vec![
            attributed("A", "North", 5, Some("2025-02-10")),
            attributed("B", "South", 0, Some("2025-02-12")),
        ];

        let aggregates = aggregate_by_region(&input, &layer(&["North", "South"]));

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].region_key, "North");
        assert_eq!(aggregates[0].fatalities, 5);
        assert_eq!(aggregates[1].region_key, "South");
        assert_eq!(aggregates[1].fatalities, 0);
    }

    #[test]
    fn zero_event_regions_still_appear() {
        let input = vec![attributed("A", "North", 3, Some("2025-01-05"))];
        let aggregates = aggregate_by_region(&input, &layer(&["East", "North", "South"]));

        let keys: Vec<&str> = aggregates.iter().map(|a| a.region_key.as_str()).collect();
        assert_eq!(keys, vec!["East", "North", "South"]);
        assert_eq!(aggregates[0].fatalities, 0);
        assert_eq!(aggregates[2].events, 0);
    }

    #[test]
    fn output_sorted_by_region_key() {
        let input = vec![
            attributed("A", "Zalingei", 1, Some("2025-01-05")),
            attributed("B", "Al Fashir", 2, Some("2025-01-06")),
        ];
        let aggregates = aggregate_by_region(&input, &layer(&["Zalingei", "Al Fashir"]));

        let keys: Vec<&str> = aggregates.iter().map(|a| a.region_key.as_str()).collect();
        assert_eq!(keys, vec!["Al Fashir", "Zalingei"]);
    }

    #[test]
    fn matrix_buckets_by_month_and_excludes_undated() {
        let input = vec![
            attributed("A", "North", 5, Some("2025-02-10")),
            attributed("B", "North", 2, Some("2025-02-25")),
            attributed("C", "North", 1, Some("2025-03-01")),
            attributed("D", "North", 4, None),
        ];

        let matrix = aggregate_by_region_and_month(&input, &layer(&["North", "South"]));

        let feb = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let mar = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(matrix.months(), &[feb, mar]);
        assert_eq!(matrix.fatalities("North", feb), 7);
        assert_eq!(matrix.fatalities("North", mar), 1);
        assert_eq!(matrix.fatalities("South", feb), 0);
        assert_eq!(matrix.unparsed_fatalities("North"), 4);
        assert_eq!(matrix.region_keys(), vec!["North", "South"]);
    }

    #[test]
    fn region_totals_reconcile_with_matrix_totals() {
        let input = vec![
            attributed("A", "North", 5, Some("2025-02-10")),
            attributed("B", "North", 3, None),
            attributed("C", "South", 2, Some("2025-04-01")),
        ];
        let boundary = layer(&["North", "South"]);

        let totals = aggregate_by_region(&input, &boundary);
        let matrix = aggregate_by_region_and_month(&input, &boundary);

        for aggregate in &totals {
            let key = aggregate.region_key.as_str();
            // The difference between the two aggregates is exactly the
            // fatalities of events with unparseable dates.
            assert_eq!(
                aggregate.fatalities - matrix.region_total(key),
                matrix.unparsed_fatalities(key),
            );
        }
    }
}
