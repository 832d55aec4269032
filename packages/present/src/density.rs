//! H3 hexbin density grid for the conflict density view.
//!
//! Bins event points into H3 cells at a caller-chosen resolution and
//! sums event counts and fatalities per cell. Resolution 5 (~8km edge)
//! suits country-level density maps.

use std::collections::BTreeMap;

use conflict_map_event_models::ConflictEvent;
use h3o::{CellIndex, LatLng, Resolution};

/// One H3 cell with its event density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityCell {
    /// H3 cell index at the requested resolution.
    pub cell: CellIndex,
    /// Number of events in the cell.
    pub events: u64,
    /// Sum of fatalities across those events.
    pub fatalities: u64,
}

/// Bins events into H3 cells at `resolution`.
///
/// Cells are returned in index order. Events whose coordinates H3
/// rejects are skipped with a warn log.
#[must_use]
pub fn to_density_cells(events: &[ConflictEvent], resolution: Resolution) -> Vec<DensityCell> {
    let mut cells: BTreeMap<CellIndex, (u64, u64)> = BTreeMap::new();
    let mut skipped = 0usize;

    for event in events {
        let Ok(coord) = LatLng::new(event.latitude, event.longitude) else {
            skipped += 1;
            continue;
        };
        let cell = coord.to_cell(resolution);
        let entry = cells.entry(cell).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u64::from(event.fatalities);
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} event(s) with coordinates H3 rejected");
    }

    cells
        .into_iter()
        .map(|(cell, (events, fatalities))| DensityCell {
            cell,
            events,
            fatalities,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_event;

    #[test]
    fn groups_nearby_events_into_one_cell() {
        // Two points meters apart share a resolution-5 cell; a point on
        // another continent does not.
        let events = vec![
            test_event("A", 32.5532, 15.5532, 2),
            test_event("B", 32.5533, 15.5533, 3),
            test_event("C", -74.0060, 40.7128, 1),
        ];

        let cells = to_density_cells(&events, Resolution::Five);

        assert_eq!(cells.len(), 2);
        let total_events: u64 = cells.iter().map(|c| c.events).sum();
        let total_fatalities: u64 = cells.iter().map(|c| c.fatalities).sum();
        assert_eq!(total_events, 3);
        assert_eq!(total_fatalities, 6);
        assert!(cells.iter().any(|c| c.events == 2 && c.fatalities == 5));
    }

    #[test]
    fn empty_input_yields_empty_grid() {
        assert!(to_density_cells(&[], Resolution::Five).is_empty());
    }
}
