//! Backend trait for chat-completion capable services.
//!
//! The suggester talks to exactly one backend, chosen once at startup from
//! configuration. Backends receive the finished prompt and return the raw
//! reply text; normalization happens in the caller so that both backends
//! post-process identically.

use async_trait::async_trait;

use crate::Result;

/// A chat-completion service that can answer a single prompt.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name for logging and metrics labels.
    fn name(&self) -> &str;

    /// Model the backend sends requests to.
    fn model(&self) -> &str;

    /// Send one user prompt and return the raw text of the reply.
    async fn suggest(&self, prompt: &str) -> Result<String>;
}

