//! Labeled evaluation cases

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AnnotatorError, Result};

/// A labeled `(key, value, expected)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub key: String,
    pub value: Value,
    pub expected: String,
}

impl TestCase {
    pub fn new(key: impl Into<String>, value: Value, expected: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            expected: expected.into(),
        }
    }

    /// Decode one raw entry of a test-case file.
    pub fn from_value(raw: &Value) -> Result<Self> {
        serde_json::from_value(raw.clone())
            .map_err(|e| AnnotatorError::InvalidTestCase(e.to_string()))
    }

    /// Best-effort key of a raw entry, for reporting entries that failed to decode.
    pub fn raw_key(raw: &Value) -> &str {
        raw.get("key").and_then(Value::as_str).unwrap_or("?")
    }

    /// The label in the form predictions are compared against.
    pub fn expected_normalized(&self) -> String {
        self.expected.to_lowercase()
    }
}
