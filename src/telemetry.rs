//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `schema_annotator_`. Counters end in
//! `_total`, histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend`: chat backend name ("local" or "remote")
//! - `status`: outcome: "ok" or "error"
//! - `outcome`: evaluation bucket: "tp", "fp" or "fn"

/// Total chat requests sent to a backend.
///
/// Labels: `backend`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "schema_annotator_requests_total";

/// Chat request duration in seconds.
///
/// Labels: `backend`.
pub const REQUEST_DURATION_SECONDS: &str = "schema_annotator_request_duration_seconds";

/// Total evaluated cases, by classification bucket.
///
/// Labels: `outcome` ("tp" | "fp" | "fn").
pub const CASES_TOTAL: &str = "schema_annotator_cases_total";
