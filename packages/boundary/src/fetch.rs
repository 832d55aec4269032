//! HTTP fetch helper for boundary sources.
//!
//! Boundary endpoints are static datasets behind CDNs; failures are
//! usually transient. Each request is retried a few times with backoff
//! before surfacing [`BoundaryError::ServiceUnavailable`].

use std::time::Duration;

use crate::BoundaryError;

/// Retry attempts per request.
const MAX_RETRIES: u32 = 3;

/// Fetches a URL and parses the body as JSON.
///
/// Retries transport errors, HTTP 429, and HTTP 5xx with exponential
/// backoff. Other non-success statuses fail immediately.
///
/// # Errors
///
/// Returns [`BoundaryError::ServiceUnavailable`] on a non-success response
/// or exhausted retries, and [`BoundaryError::Json`] if the body is not
/// valid JSON.
#[allow(clippy::future_not_send)]
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    label: &str,
) -> Result<serde_json::Value, BoundaryError> {
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt);
            log::warn!("{label}: retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match client.get(url).send().await {
            Err(e) => {
                let transient = e.is_timeout() || e.is_connect() || e.is_request();
                if transient && attempt < MAX_RETRIES {
                    log::warn!("{label}: transient error: {e}");
                    continue;
                }
                return Err(BoundaryError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
                {
                    if attempt < MAX_RETRIES {
                        log::warn!("{label}: HTTP {status}, retrying");
                        continue;
                    }
                    return Err(BoundaryError::ServiceUnavailable {
                        message: format!("{label} returned HTTP {status} after retries"),
                    });
                }

                if !status.is_success() {
                    return Err(BoundaryError::ServiceUnavailable {
                        message: format!("{label} returned HTTP {status}"),
                    });
                }

                let text = response.text().await?;
                return Ok(serde_json::from_str(&text)?);
            }
        }
    }

    Err(BoundaryError::ServiceUnavailable {
        message: format!("{label} request failed after all retries"),
    })
}
