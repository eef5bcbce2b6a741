//! Shared HTTP plumbing for the chat backends.

use std::time::{Duration, Instant};

use reqwest::{Client, Response};

use crate::telemetry;
use crate::{AnnotatorError, Result};

/// Default request timeout applied to backend HTTP clients.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Build an HTTP client with the given request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AnnotatorError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Check response status and map to the matching error.
///
/// The body of a failed response is read so the message carries whatever
/// the service said about the failure.
pub(crate) async fn check_status(response: Response, model: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => Err(AnnotatorError::AuthenticationFailed),
        404 => Err(AnnotatorError::ModelNotFound(model.to_string())),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(AnnotatorError::RateLimited { retry_after })
        }
        code => {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            };
            Err(AnnotatorError::Api {
                status: code,
                message,
            })
        }
    }
}

/// Record request outcome metrics (counter + histogram).
pub(crate) fn record_request(backend: &str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "backend" => backend.to_owned(),
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "backend" => backend.to_owned(),
    )
    .record(start.elapsed().as_secs_f64());
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
