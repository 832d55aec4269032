#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fetch-render pipeline orchestration.
//!
//! Chains fetch -> normalize -> window filter -> boundary resolution ->
//! clip -> aggregate in a single sequential flow, owning the session's
//! explicit caches. Each stage runs to completion before the next; there
//! is no background work and no shared mutable state across sessions.

pub mod cache;
pub mod session;

pub use cache::{BoundaryCache, FetchCache};
pub use session::SessionContext;

use conflict_map_acled::{AcledClient, DateWindow, SourceError};
use conflict_map_aggregate::{
    RegionAggregate, RegionMonthMatrix, aggregate_by_region, aggregate_by_region_and_month,
};
use conflict_map_boundary::{BoundaryError, BoundaryResolver, map_center};
use conflict_map_boundary_models::{AdminLevel, BoundaryLayer};
use conflict_map_event_models::{AttributedEvent, ConflictEvent};
use conflict_map_present::choropleth::{ChoroplethRegion, to_choropleth};
use conflict_map_present::classify::{DEFAULT_CLASSES, NaturalBreaks};
use conflict_map_spatial::{BoundaryIndex, SpatialError, clip, join};

/// Errors that can abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Event fetch or normalization failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Boundary resolution failed.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// Spatial precondition violated.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// A view was requested before any conflict data was fetched.
    #[error("no conflict data loaded; fetch conflict events first")]
    NoDataLoaded,
}

/// The clipped result of one fetch, kept for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictSnapshot {
    /// Country the events were fetched for.
    pub iso3: String,
    /// Date window the events were filtered to.
    pub window: DateWindow,
    /// Events inside the national boundary, attributed to it.
    pub events: Vec<AttributedEvent>,
    /// Map center `(lat, lon)` derived from the boundary centroid.
    pub map_center: (f64, f64),
}

impl ConflictSnapshot {
    /// The underlying events, detached from their attribution.
    #[must_use]
    pub fn events(&self) -> Vec<ConflictEvent> {
        self.events.iter().map(|a| a.event.clone()).collect()
    }
}

/// Terminal state of a fetch: data, or a valid empty result the
/// presentation layer must surface as an explicit "no data" signal.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Events were found inside the boundary and window.
    Data(ConflictSnapshot),
    /// Zero events survived filtering. Not a failure.
    Empty {
        /// Country that was queried.
        iso3: String,
        /// Date window that was queried.
        window: DateWindow,
    },
}

/// The admin-1 aggregation view: layer, totals, time series, choropleth.
#[derive(Debug, Clone, PartialEq)]
pub struct Admin1View {
    /// The admin-1 boundary layer.
    pub layer: BoundaryLayer,
    /// Per-region totals, zero-filled over the layer.
    pub totals: Vec<RegionAggregate>,
    /// Region × month fatality matrix.
    pub matrix: RegionMonthMatrix,
    /// Classified regions ready for shading.
    pub choropleth: Vec<ChoroplethRegion>,
}

/// The conflict data pipeline with its per-session collaborators.
pub struct Pipeline {
    client: AcledClient,
    resolver: BoundaryResolver,
    fetch_cache: FetchCache,
    boundary_cache: BoundaryCache,
}

impl Pipeline {
    /// Creates a pipeline from its external collaborators.
    #[must_use]
    pub fn new(client: AcledClient, resolver: BoundaryResolver) -> Self {
        Self {
            client,
            resolver,
            fetch_cache: FetchCache::new(),
            boundary_cache: BoundaryCache::new(),
        }
    }

    /// Fetches, normalizes, windows, and clips conflict events for a
    /// country, updating the session on success.
    ///
    /// Selecting a different country than the session's current one
    /// clears both caches first. Cached snapshots are reused for repeat
    /// (country, window) requests. Failures abort without caching
    /// partial results.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the fetch, boundary resolution, or
    /// spatial stage fails. An empty result is [`FetchOutcome::Empty`],
    /// not an error.
    #[allow(clippy::future_not_send)]
    pub async fn run_fetch(
        &mut self,
        ctx: &mut SessionContext,
        iso3: &str,
        window: DateWindow,
    ) -> Result<FetchOutcome, PipelineError> {
        if ctx.select_country(iso3) {
            self.fetch_cache.clear();
            self.boundary_cache.clear();
        }
        ctx.select_window(window);

        if let Some(snapshot) = self.fetch_cache.get(iso3, &window) {
            log::info!("Reusing cached events for {iso3} {window}");
            let snapshot = snapshot.clone();
            ctx.store_snapshot(snapshot.clone());
            return Ok(FetchOutcome::Data(snapshot));
        }

        let events = self.client.fetch_events(iso3, Some(&window)).await?;
        let layer = self.boundary(iso3, AdminLevel::National).await?;
        let index = BoundaryIndex::build(&layer)?;
        let clipped = clip(&events, &index);

        let outcome = assemble_snapshot(iso3, window, clipped, &layer);
        if let FetchOutcome::Data(snapshot) = &outcome {
            self.fetch_cache.insert(snapshot.clone());
            ctx.store_snapshot(snapshot.clone());
            log::info!(
                "Fetched {} conflict events for {iso3} {window}",
                snapshot.events.len()
            );
        } else {
            log::info!("No conflict events for {iso3} {window}");
        }

        Ok(outcome)
    }

    /// Builds the admin-1 aggregation view from the session's snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoDataLoaded`] when no fetch has
    /// completed this session, and the underlying error if admin-1
    /// boundary resolution or indexing fails.
    #[allow(clippy::future_not_send)]
    pub async fn run_admin1(&mut self, ctx: &SessionContext) -> Result<Admin1View, PipelineError> {
        let snapshot = ctx.snapshot().ok_or(PipelineError::NoDataLoaded)?;
        let events = snapshot.events();
        let iso3 = snapshot.iso3.clone();

        let layer = self.boundary(&iso3, AdminLevel::Admin1).await?;
        let index = BoundaryIndex::build(&layer)?;
        let joined = join(&events, &index);

        Ok(assemble_admin1_view(&joined, layer))
    }

    /// Resolves a boundary layer through the session cache.
    #[allow(clippy::future_not_send)]
    async fn boundary(
        &mut self,
        iso3: &str,
        level: AdminLevel,
    ) -> Result<BoundaryLayer, PipelineError> {
        if let Some(layer) = self.boundary_cache.get(iso3, level) {
            return Ok(layer.clone());
        }

        let layer = self.resolver.resolve(iso3, level).await?;
        self.boundary_cache.insert(layer.clone());
        Ok(layer)
    }
}

/// Assembles the fetch outcome from clipped events and their boundary.
#[must_use]
pub fn assemble_snapshot(
    iso3: &str,
    window: DateWindow,
    clipped: Vec<AttributedEvent>,
    layer: &BoundaryLayer,
) -> FetchOutcome {
    if clipped.is_empty() {
        return FetchOutcome::Empty {
            iso3: iso3.to_string(),
            window,
        };
    }

    FetchOutcome::Data(ConflictSnapshot {
        iso3: iso3.to_string(),
        window,
        events: clipped,
        map_center: map_center(layer).unwrap_or_default(),
    })
}

/// Assembles the admin-1 view from joined events and their layer.
#[must_use]
pub fn assemble_admin1_view(joined: &[AttributedEvent], layer: BoundaryLayer) -> Admin1View {
    let totals = aggregate_by_region(joined, &layer);
    let matrix = aggregate_by_region_and_month(joined, &layer);
    let choropleth = to_choropleth(&totals, &layer, &NaturalBreaks, DEFAULT_CLASSES);

    Admin1View {
        layer,
        totals,
        matrix,
        choropleth,
    }
}
