//! Remote hosted backend (OpenAI-compatible chat completions).
//!
//! Works against any service exposing `POST {base_url}/chat/completions`
//! with bearer authentication.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::http::{DEFAULT_TIMEOUT, build_client, check_status, join_url, record_request};
use super::traits::ChatBackend;
use crate::types::Message;
use crate::{AnnotatorError, Result};

/// Default base URL for the hosted API
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default hosted model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature used unless configured otherwise.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Backend for a hosted chat-completion API.
#[derive(Clone)]
pub struct RemoteChatBackend {
    api_key: String,
    http: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl RemoteChatBackend {
    /// Create a backend against the default hosted endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, model, DEFAULT_TIMEOUT)
    }

    /// Create a backend with a custom base URL (also used for testing with wiremock).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            http: build_client(timeout)?,
            base_url: base_url.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Override the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let url = join_url(&self.base_url, "/chat/completions");
        let messages = [Message::user(prompt)];

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages: &messages,
                temperature: self.temperature,
                n: 1,
            })
            .send()
            .await?;

        let response = check_status(response, &self.model).await?;

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AnnotatorError::Http(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AnnotatorError::EmptyResponse)?;

        debug!(reply = %content, "remote backend replied");
        Ok(content)
    }
}

#[async_trait]
impl ChatBackend for RemoteChatBackend {
    fn name(&self) -> &str {
        "remote"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(name = "remote.suggest", skip(self, prompt), fields(backend = "remote", model = %self.model))]
    async fn suggest(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.send(prompt).await;
        record_request(self.name(), start, result.is_ok());
        result
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    n: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
