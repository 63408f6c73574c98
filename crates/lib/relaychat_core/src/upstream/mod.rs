//! Upstream provider: the generative-AI HTTP API the relay forwards to.
//!
//! The relay only ever talks to an [`Upstream`]; [`openai::OpenAiUpstream`]
//! is the production implementation. Every call is a single attempt.

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ChatMessage;

pub use openai::OpenAiUpstream;

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// Model identifier sent with every completion request.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
/// Resolution requested for generated images.
pub const DEFAULT_IMAGE_SIZE: &str = "512x512";

/// Errors that can occur while talking to the upstream provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),

    #[error("Upstream response was empty: {0}")]
    EmptyResponse(&'static str),
}

/// A provider of chat completions and image generations.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Returns the content of the first completion choice for `messages`.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, UpstreamError>;

    /// Generates exactly one image for `prompt` and returns its URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError>;
}
