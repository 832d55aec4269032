//! Typed per-session state.
//!
//! Replaces the hosting application's untyped session dictionary with an
//! explicit context object. The host creates one per user session; the
//! pipeline reads and writes it between invocations. Changing the
//! selected country clears all dependent state.

use conflict_map_acled::DateWindow;

use crate::ConflictSnapshot;

/// Explicit session state shared across pipeline invocations.
#[derive(Debug, Default)]
pub struct SessionContext {
    iso3: Option<String>,
    window: Option<DateWindow>,
    snapshot: Option<ConflictSnapshot>,
}

impl SessionContext {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the selected country, clearing the loaded snapshot when
    /// the selection actually changed. Returns `true` on change.
    pub fn select_country(&mut self, iso3: &str) -> bool {
        if self.iso3.as_deref() == Some(iso3) {
            return false;
        }
        log::info!("Country changed to {iso3}; clearing session data");
        self.iso3 = Some(iso3.to_string());
        self.snapshot = None;
        true
    }

    /// Records the selected date window.
    pub fn select_window(&mut self, window: DateWindow) {
        self.window = Some(window);
    }

    /// The selected country, if any.
    #[must_use]
    pub fn iso3(&self) -> Option<&str> {
        self.iso3.as_deref()
    }

    /// The selected date window, if any.
    #[must_use]
    pub fn window(&self) -> Option<&DateWindow> {
        self.window.as_ref()
    }

    /// The loaded snapshot, if a fetch has completed this session.
    #[must_use]
    pub fn snapshot(&self) -> Option<&ConflictSnapshot> {
        self.snapshot.as_ref()
    }

    /// Stores a fetched snapshot along with the inputs that produced it,
    /// keeping the selection fields in sync.
    pub fn store_snapshot(&mut self, snapshot: ConflictSnapshot) {
        self.iso3 = Some(snapshot.iso3.clone());
        self.window = Some(snapshot.window);
        self.snapshot = Some(snapshot);
    }
}
