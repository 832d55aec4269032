#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! ACLED conflict event API client and normalization logic.
//!
//! Fetches raw event records from the ACLED `read` endpoint and normalizes
//! them into the canonical [`ConflictEvent`](conflict_map_event_models::ConflictEvent)
//! schema. Fetching is paginated and retried; normalization is tolerant of
//! the partially-missing fields ACLED routinely returns.

pub mod client;
pub mod normalize;
pub mod parsing;
pub mod retry;

pub use client::{ACLED_API_URL, AcledClient};

use chrono::NaiveDate;

/// Errors that can occur while fetching or normalizing ACLED data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The API payload lacks a recognizable records container.
    #[error("Malformed ACLED response: {message}")]
    MalformedResponse {
        /// Description of what went wrong.
        message: String,
    },

    /// The fetch failed after exhausting retries, or the API reported
    /// failure in its envelope.
    #[error("ACLED fetch failed: {message}")]
    FetchFailed {
        /// Description of what went wrong, including country context.
        message: String,
    },
}

/// ACLED API credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct AcledCredentials {
    /// API key issued by ACLED.
    pub api_key: String,
    /// Registered email address paired with the key.
    pub email: String,
}

impl AcledCredentials {
    /// Reads credentials from `ACLED_API_KEY` and `ACLED_EMAIL`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if either variable is unset.
    pub fn from_env() -> Result<Self, SourceError> {
        let api_key = std::env::var("ACLED_API_KEY").map_err(|_| SourceError::Config {
            message: "ACLED_API_KEY environment variable not set".to_string(),
        })?;
        let email = std::env::var("ACLED_EMAIL").map_err(|_| SourceError::Config {
            message: "ACLED_EMAIL environment variable not set".to_string(),
        })?;
        Ok(Self { api_key, email })
    }
}

/// An inclusive calendar date range used to window fetched events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    /// First date of the window (inclusive).
    pub start: NaiveDate,
    /// Last date of the window (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Returns `true` if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}
