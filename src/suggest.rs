//! Key/value to property suggestion.
//!
//! [`Suggester`] glues the prompt template, one [`ChatBackend`] and answer
//! normalization together. The evaluation harness and the annotation session
//! depend only on the [`Suggest`] trait so they can be driven by test doubles.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::prompt::{build_prompt, normalize_response};
use crate::providers::ChatBackend;
use crate::types::{Prediction, error_marker};
use crate::Result;

/// Anything that can suggest a Schema.org property for a key/value pair.
#[async_trait]
pub trait Suggest: Send + Sync {
    /// Suggest a property, or report why the backend could not answer.
    async fn suggest(&self, key: &str, value: &Value) -> Result<Prediction>;

    /// String-only form: failures come back as `"erro: <message>"`.
    async fn suggest_or_marker(&self, key: &str, value: &Value) -> String {
        match self.suggest(key, value).await {
            Ok(prediction) => prediction.into(),
            Err(e) => error_marker(&e),
        }
    }
}

/// Suggests properties by prompting a chat backend.
pub struct Suggester {
    backend: Box<dyn ChatBackend>,
}

impl Suggester {
    pub fn new(backend: Box<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn ChatBackend {
        self.backend.as_ref()
    }
}

#[async_trait]
impl Suggest for Suggester {
    #[instrument(skip(self, value), fields(backend = %self.backend.name()))]
    async fn suggest(&self, key: &str, value: &Value) -> Result<Prediction> {
        let prompt = build_prompt(key, value);
        debug!(%prompt, "sending prompt");
        let reply = self.backend.suggest(&prompt).await?;
        Ok(normalize_response(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnnotatorError;
    use serde_json::json;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl ChatBackend for CannedBackend {
        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned-model"
        }

        async fn suggest(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DownBackend;

    #[async_trait]
    impl ChatBackend for DownBackend {
        fn name(&self) -> &str {
            "down"
        }

        fn model(&self) -> &str {
            "none"
        }

        async fn suggest(&self, _prompt: &str) -> Result<String> {
            Err(AnnotatorError::Http("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn reply_is_normalized() {
        let suggester = Suggester::new(Box::new(CannedBackend("Name\nExtra commentary")));
        let prediction = suggester.suggest("nome", &json!("Ada")).await.unwrap();
        assert_eq!(prediction, Prediction::Property("name".to_string()));
    }

    #[tokio::test]
    async fn marker_form_for_failures() {
        let suggester = Suggester::new(Box::new(DownBackend));
        let marker = suggester.suggest_or_marker("price", &json!(1)).await;
        assert_eq!(marker, "erro: HTTP error: connection refused");
    }

    #[tokio::test]
    async fn marker_form_for_sentinel() {
        let suggester = Suggester::new(Box::new(CannedBackend("N/A")));
        assert_eq!(suggester.suggest_or_marker("x", &json!(null)).await, "n/a");
    }
}
