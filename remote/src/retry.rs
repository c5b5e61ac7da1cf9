//! Retry policy for content and configuration reads.
//!
//! Collection reads are uniform: a bounded number of attempts with
//! exponential backoff and down-jitter, retrying on transient statuses
//! (408, 429, 5xx) and connection errors. A `Retry-After` header is honored
//! when it names a delay under a sanity bound. The admin-visibility probe
//! deliberately bypasses this module; its two calls are single-attempt.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::error::RemoteError;

/// Retry configuration for collection reads.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub initial_delay: Duration,
    /// Backoff cap.
    pub max_delay: Duration,
    /// Down-jitter factor (0.25 = delay shrinks by up to 25%).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(300),
            max_delay: Duration::from_secs(5),
            jitter_factor: 0.25,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries; the gate's calls use plain requests
    /// instead, but tests use this to pin attempt counts.
    #[must_use]
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Parse a `Retry-After` header given in seconds.
///
/// Returns `Some` only for values in `(0, 60)` seconds; anything else falls
/// back to computed backoff.
#[must_use]
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers.get("retry-after")?.to_str().ok()?.parse::<u64>().ok()?;
    let duration = Duration::from_secs(secs);
    if duration > Duration::ZERO && duration < Duration::from_secs(60) {
        Some(duration)
    } else {
        None
    }
}

pub(crate) fn should_retry_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500..=599)
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Delay before retry number `backoff_step + 1`.
fn backoff_delay(backoff_step: u32, policy: &RetryPolicy, headers: Option<&HeaderMap>) -> Duration {
    if let Some(headers) = headers
        && let Some(delay) = parse_retry_after(headers)
    {
        return delay;
    }

    let base = policy.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = base.min(policy.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * policy.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

/// Send a request, retrying transient failures under `policy`.
///
/// `build_request` is called once per attempt. Success is any 2xx response;
/// a non-retryable status, or a retryable one once attempts are exhausted,
/// surfaces as [`RemoteError::Status`] tagged with `context`.
pub async fn send_with_retry<F>(
    context: &'static str,
    policy: &RetryPolicy,
    build_request: F,
) -> Result<Response, RemoteError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt: u32 = 0;
    loop {
        let last = attempt + 1 >= policy.max_attempts;
        match build_request().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }
                if !last && should_retry_status(status) {
                    let delay = backoff_delay(attempt, policy, Some(response.headers()));
                    tracing::debug!(
                        context,
                        status = %status,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        "Retrying after error status"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(RemoteError::Status { status, context });
            }
            Err(e) => {
                if !last && is_retryable_error(&e) {
                    let delay = backoff_delay(attempt, policy, None);
                    tracing::debug!(
                        context,
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        "Retrying after connection error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(RemoteError::Transport(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn retryable_statuses() {
        assert!(should_retry_status(StatusCode::REQUEST_TIMEOUT));
        assert!(should_retry_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(should_retry_status(StatusCode::SERVICE_UNAVAILABLE));

        assert!(!should_retry_status(StatusCode::BAD_REQUEST));
        assert!(!should_retry_status(StatusCode::NOT_FOUND));
        assert!(!should_retry_status(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn retry_after_parsed_within_sanity_bound() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("3"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(3)));
    }

    #[test]
    fn retry_after_out_of_range_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("120"));
        assert_eq!(parse_retry_after(&headers), None);

        headers.clear();
        headers.insert("retry-after", HeaderValue::from_static("0"));
        assert_eq!(parse_retry_after(&headers), None);

        headers.clear();
        headers.insert("retry-after", HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn backoff_respects_jitter_bounds() {
        let policy = RetryPolicy::default();

        // First retry: base 300ms, jitter in [0.75, 1.0].
        for _ in 0..100 {
            let delay = backoff_delay(0, &policy, None);
            assert!(delay >= Duration::from_millis(225));
            assert!(delay <= Duration::from_millis(300));
        }

        // Second retry: base 600ms.
        for _ in 0..100 {
            let delay = backoff_delay(1, &policy, None);
            assert!(delay >= Duration::from_millis(450));
            assert!(delay <= Duration::from_millis(600));
        }
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy {
            jitter_factor: 0.0,
            ..RetryPolicy::default()
        };
        let delay = backoff_delay(20, &policy, None);
        assert_eq!(delay, policy.max_delay);
    }
}
