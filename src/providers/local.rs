//! Local inference server backend (Ollama chat API).
//!
//! Sends a single non-streaming request to `{base_url}/api/chat`.
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion>

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::http::{DEFAULT_TIMEOUT, build_client, check_status, join_url, record_request};
use super::traits::ChatBackend;
use crate::types::Message;
use crate::{AnnotatorError, Result};

/// Default base URL of a local Ollama server
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model served by the local server
pub const DEFAULT_MODEL: &str = "llama3:latest";

/// Backend for a local inference server speaking the Ollama chat protocol.
#[derive(Clone)]
pub struct LocalChatBackend {
    http: Client,
    base_url: String,
    model: String,
}

impl LocalChatBackend {
    /// Create a backend for `model` on the default local endpoint.
    pub fn new(model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, model, DEFAULT_TIMEOUT)
    }

    /// Create a backend with a custom base URL (also used for testing with wiremock).
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let url = join_url(&self.base_url, "/api/chat");
        let messages = [Message::user(prompt)];

        let response = self
            .http
            .post(&url)
            .json(&ChatRequest {
                model: &self.model,
                messages: &messages,
                stream: false,
            })
            .send()
            .await?;

        let response = check_status(response, &self.model).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnnotatorError::Http(e.to_string()))?;

        debug!(reply = %body.message.content, "local backend replied");
        Ok(body.message.content)
    }
}

#[async_trait]
impl ChatBackend for LocalChatBackend {
    fn name(&self) -> &str {
        "local"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(name = "local.suggest", skip(self, prompt), fields(backend = "local", model = %self.model))]
    async fn suggest(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.send(prompt).await;
        record_request(self.name(), start, result.is_ok());
        result
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_shape() {
        let messages = [Message::user("hello")];
        let body = serde_json::to_value(ChatRequest {
            model: "llama3:latest",
            messages: &messages,
            stream: false,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "llama3:latest",
                "messages": [{"role": "user", "content": "hello"}],
                "stream": false
            })
        );
    }

    #[test]
    fn response_ignores_extra_fields() {
        let body: ChatResponse = serde_json::from_value(json!({
            "model": "llama3:latest",
            "message": {"role": "assistant", "content": "price"},
            "done": true
        }))
        .unwrap();
        assert_eq!(body.message.content, "price");
    }
}
