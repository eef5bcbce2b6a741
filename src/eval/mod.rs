//! Batch evaluation of suggestions against a labeled test set.
//!
//! The harness takes the first N entries of a test-case file, asks the
//! suggester about each one in order and scores the answers:
//!
//! | answer                     | bucket         |
//! |----------------------------|----------------|
//! | equals the label           | true positive  |
//! | `n/a`                      | false negative |
//! | anything else              | false positive |
//! | backend failure            | per [`ErrorPolicy`] |
//! | entry fails to decode      | false negative |

mod harness;
mod metrics;
mod pacing;
mod report;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{AnnotatorError, Result};

pub use harness::{DEFAULT_MAX_CASES, ErrorPolicy, Evaluator, classify};
pub use metrics::{Counters, Metrics, Outcome};
pub use pacing::Pacing;
pub use report::{CaseRecord, CaseResult, EvaluationReport};

/// Load a test-case file: a JSON array of `{"key", "value", "expected"}`.
///
/// Entries are returned undecoded; the harness decodes them one at a time.
pub fn load_test_cases(path: &Path) -> Result<Vec<Value>> {
    let load_err = |reason: String| AnnotatorError::TestCases {
        path: path.display().to_string(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    match serde_json::from_str::<Value>(&content).map_err(|e| load_err(e.to_string()))? {
        Value::Array(cases) => Ok(cases),
        _ => Err(load_err("expected a JSON array".to_string())),
    }
}
