//! HTTP retry helper for transient errors.
//!
//! Fetchers call [`send_json`] instead of `reqwest::RequestBuilder::send()`
//! directly, so every request gets automatic retry with exponential backoff
//! on timeouts, connection resets, HTTP 429, and HTTP 5xx. Other 4xx
//! statuses are permanent and fail immediately.

use std::time::Duration;

use crate::SourceError;

/// Maximum retry attempts for transient HTTP errors. With exponential
/// backoff (2s, 4s, 8s, 16s, 32s) the total wait before giving up is 62
/// seconds.
const MAX_RETRIES: u32 = 5;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// # Errors
///
/// Returns [`SourceError::FetchFailed`] if the request still fails after
/// all retries or the server returns a non-retryable status code, and
/// [`SourceError::Http`] for non-transient transport errors. A body that
/// cannot be parsed as JSON surfaces as [`SourceError::Json`].
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Core retry loop. Returns the successful [`reqwest::Response`]
/// (status 2xx or 3xx).
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt);
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < MAX_RETRIES {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(SourceError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                let retryable = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error();
                if retryable {
                    if attempt < MAX_RETRIES {
                        log::warn!("  HTTP {status}, retrying");
                        continue;
                    }
                    return Err(SourceError::FetchFailed {
                        message: format!("HTTP {status} after {MAX_RETRIES} retries"),
                    });
                }

                // Other 4xx are permanent (bad credentials, bad query)
                if status.is_client_error() {
                    return Err(SourceError::FetchFailed {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }

    Err(SourceError::FetchFailed {
        message: "request failed after all retries".to_string(),
    })
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
