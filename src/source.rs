//! Where the document to annotate comes from.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::providers::http::build_client;
use crate::{AnnotatorError, Result};

/// Label recorded for documents typed or pasted by the operator.
pub const MANUAL_LABEL: &str = "Manual";

/// Input to an annotation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonSource {
    /// JSON text supplied directly.
    Manual(String),
    /// URL answering an unauthenticated GET with JSON.
    Url(String),
}

/// A parsed input document and the label it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub label: String,
    pub data: Value,
}

impl JsonSource {
    /// Label used for the `fonte` field of the annotated output.
    pub fn label(&self) -> &str {
        match self {
            JsonSource::Manual(_) => MANUAL_LABEL,
            JsonSource::Url(url) => url,
        }
    }

    /// Parse or fetch the document.
    #[instrument(skip(self), fields(source = %self.label()))]
    pub async fn load(&self, timeout: Duration) -> Result<SourceDocument> {
        let data = match self {
            JsonSource::Manual(text) => serde_json::from_str(text.trim())
                .map_err(|e| AnnotatorError::InvalidInput(format!("invalid JSON: {e}")))?,
            JsonSource::Url(url) => fetch_json(url, timeout).await?,
        };
        Ok(SourceDocument {
            label: self.label().to_string(),
            data,
        })
    }
}

async fn fetch_json(url: &str, timeout: Duration) -> Result<Value> {
    let http = build_client(timeout)?;
    let response = http.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AnnotatorError::Api {
            status: status.as_u16(),
            message: format!("GET {url} returned {status}"),
        });
    }

    let data: Value = response
        .json()
        .await
        .map_err(|e| AnnotatorError::InvalidInput(format!("response is not JSON: {e}")))?;
    debug!(%url, "fetched document");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn manual_json_is_parsed() {
        let doc = JsonSource::Manual(r#" {"name": "Ada"} "#.to_string())
            .load(Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(doc.label, "Manual");
        assert_eq!(doc.data, json!({"name": "Ada"}));
    }

    #[tokio::test]
    async fn invalid_manual_json_is_input_error() {
        let err = JsonSource::Manual("{not json".to_string())
            .load(Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AnnotatorError::InvalidInput(_)));
    }

    #[test]
    fn url_label_is_the_url() {
        let source = JsonSource::Url("https://example.com/item.json".to_string());
        assert_eq!(source.label(), "https://example.com/item.json");
    }
}
