//! ACLED `read` endpoint client.
//!
//! Fetches conflict events for a country with pagination, validates the
//! `{ success, count, data }` envelope, and normalizes each page. API docs:
//! <https://apidocs.acleddata.com/>

use conflict_map_event_models::ConflictEvent;

use crate::normalize::{filter_window, normalize};
use crate::{AcledCredentials, DateWindow, SourceError, retry};

/// Production ACLED read endpoint.
pub const ACLED_API_URL: &str = "https://api.acleddata.com/acled/read";

/// Records requested per page. Matches the ACLED API maximum.
const PAGE_SIZE: usize = 15_000;

/// Client for the ACLED conflict event API.
pub struct AcledClient {
    http: reqwest::Client,
    base_url: String,
    credentials: AcledCredentials,
}

impl AcledClient {
    /// Creates a client against the production ACLED endpoint.
    #[must_use]
    pub fn new(credentials: AcledCredentials) -> Self {
        Self::with_base_url(credentials, ACLED_API_URL)
    }

    /// Creates a client against a custom endpoint (used by tests).
    #[must_use]
    pub fn with_base_url(credentials: AcledCredentials, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Fetches all conflict events for a country, optionally filtered to a
    /// date window.
    ///
    /// Pages through the API until a short page signals the end of the
    /// dataset. Each page is normalized as it arrives; the window filter
    /// runs once over the combined result.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::FetchFailed`] if the API reports failure in
    /// its envelope or the request fails after retries, and
    /// [`SourceError::MalformedResponse`] if a page lacks the `data`
    /// container.
    #[allow(clippy::future_not_send)]
    pub async fn fetch_events(
        &self,
        iso3: &str,
        window: Option<&DateWindow>,
    ) -> Result<Vec<ConflictEvent>, SourceError> {
        let mut all_events: Vec<ConflictEvent> = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}?key={}&email={}&iso3={iso3}&limit={PAGE_SIZE}&page={page}",
                self.base_url, self.credentials.api_key, self.credentials.email
            );

            log::info!("Fetching ACLED events for {iso3}: page {page}");
            let payload = retry::send_json(|| self.http.get(&url)).await?;

            if payload.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
                return Err(SourceError::FetchFailed {
                    message: format!("ACLED API reported failure for {iso3} (page {page})"),
                });
            }

            let events = normalize(&payload)?;
            let count = events.len();
            all_events.extend(events);

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        log::info!(
            "Fetched {} ACLED events for {iso3} across {page} page(s)",
            all_events.len()
        );

        if let Some(window) = window {
            let before = all_events.len();
            let windowed = filter_window(all_events, window);
            log::info!(
                "{} of {before} events fall inside {window}",
                windowed.len()
            );
            return Ok(windowed);
        }

        Ok(all_events)
    }
}
