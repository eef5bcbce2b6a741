//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schema_annotator::eval::{Evaluator, Pacing};
use schema_annotator::providers::{ChatBackend, LocalChatBackend};
use schema_annotator::telemetry;
use schema_annotator::{Prediction, Result, Suggest};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name and label.
fn counter_total(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| match label {
            Some((k, v)) => key.key().labels().any(|l| l.key() == k && l.value() == v),
            None => true,
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

struct AlwaysPrice;

#[async_trait]
impl Suggest for AlwaysPrice {
    async fn suggest(&self, _key: &str, _value: &Value) -> Result<Prediction> {
        Ok(Prediction::from_normalized("price"))
    }
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn backend_requests_record_metrics() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "price"}
        })))
        .mount(&mock_server)
        .await;

    let backend =
        LocalChatBackend::with_base_url(mock_server.uri(), "llama3:latest", Duration::from_secs(5))
            .unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(backend.suggest("prompt"))
        })
    });
    assert!(result.is_ok());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "ok"))),
        1
    );
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_requests_record_error_status() {
    let backend =
        LocalChatBackend::with_base_url("http://127.0.0.1:1", "llama3:latest", Duration::from_secs(2))
            .unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(backend.suggest("prompt"))
        })
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::REQUESTS_TOTAL, Some(("status", "error"))),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn evaluation_records_case_outcomes() {
    let cases = vec![
        json!({"key": "a", "value": 1, "expected": "price"}),
        json!({"key": "b", "value": 2, "expected": "color"}),
        json!({"key": "c"}),
    ];

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(
                Evaluator::new()
                    .pacing(Pacing::none())
                    .evaluate(&AlwaysPrice, &cases),
            )
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CASES_TOTAL, None), 3);
    assert_eq!(
        counter_total(&snapshot, telemetry::CASES_TOTAL, Some(("outcome", "tp"))),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::CASES_TOTAL, Some(("outcome", "fp"))),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::CASES_TOTAL, Some(("outcome", "fn"))),
        1
    );
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let cases = vec![json!({"key": "a", "value": 1, "expected": "price"})];
    let report = Evaluator::new()
        .pacing(Pacing::none())
        .evaluate(&AlwaysPrice, &cases)
        .await;
    assert_eq!(report.counters.true_positive, 1);
}
