//! Normalized model answers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved answer meaning "no suitable property found".
pub const NOT_APPLICABLE: &str = "n/a";

/// Prefix of the legacy error-marker string.
pub const ERROR_MARKER_PREFIX: &str = "erro: ";

/// A normalized suggestion: a lowercase property name or the `n/a` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Prediction {
    Property(String),
    NotApplicable,
}

impl Prediction {
    /// Wrap an already-normalized answer, recognizing the sentinel.
    pub fn from_normalized(answer: impl Into<String>) -> Self {
        let answer = answer.into();
        if answer == NOT_APPLICABLE {
            Prediction::NotApplicable
        } else {
            Prediction::Property(answer)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Prediction::Property(name) => name,
            Prediction::NotApplicable => NOT_APPLICABLE,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Prediction::NotApplicable)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Prediction {
    fn from(answer: String) -> Self {
        Prediction::from_normalized(answer)
    }
}

impl From<Prediction> for String {
    fn from(prediction: Prediction) -> Self {
        match prediction {
            Prediction::Property(name) => name,
            Prediction::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

/// Render a backend failure the way the string-only interface reports it.
pub fn error_marker(err: &impl fmt::Display) -> String {
    format!("{ERROR_MARKER_PREFIX}{err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_recognized() {
        assert_eq!(Prediction::from_normalized("n/a"), Prediction::NotApplicable);
        assert_eq!(
            Prediction::from_normalized("name"),
            Prediction::Property("name".to_string())
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Prediction::NotApplicable).unwrap();
        assert_eq!(json, "\"n/a\"");
        let back: Prediction = serde_json::from_str("\"price\"").unwrap();
        assert_eq!(back.as_str(), "price");
    }

    #[test]
    fn error_marker_has_prefix() {
        assert_eq!(error_marker(&"connection refused"), "erro: connection refused");
    }
}
