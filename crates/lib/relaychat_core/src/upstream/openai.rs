//! OpenAI-compatible provider.
//!
//! Calls `/v1/chat/completions` and `/v1/images/generations` with the
//! server-held key injected as a Bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_SIZE, Upstream, UpstreamError};
use crate::models::ChatMessage;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const IMAGE_GENERATIONS_PATH: &str = "/v1/images/generations";

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

/// [`Upstream`] backed by an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiUpstream {
    client: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    image_size: String,
}

impl OpenAiUpstream {
    /// Creates a provider for the public OpenAI API with default model and size.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }

    /// Points the provider at another OpenAI-compatible host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = size.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    pub fn image_size(&self) -> &str {
        &self.image_size
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, UpstreamError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "sending upstream request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<R>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for OpenAiUpstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiUpstream")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("chat_model", &self.chat_model)
            .field("image_size", &self.image_size)
            .finish()
    }
}

#[async_trait]
impl Upstream for OpenAiUpstream {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, UpstreamError> {
        let request = CompletionRequest {
            model: &self.chat_model,
            messages,
        };
        let response: CompletionResponse = self.post_json(COMPLETIONS_PATH, &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::EmptyResponse("no completion choices"))?
            .message
            .content
            .ok_or(UpstreamError::EmptyResponse("first choice has no content"))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = ImageRequest {
            prompt,
            n: 1,
            size: &self.image_size,
        };
        let response: ImageResponse = self.post_json(IMAGE_GENERATIONS_PATH, &request).await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or(UpstreamError::EmptyResponse("no generated image url"))
    }
}
