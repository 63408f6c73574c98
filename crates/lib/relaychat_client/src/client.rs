//! Typed HTTP client for the relay endpoints.

use std::path::Path;

use log::debug;
use relaychat_core::models::upload::{FILE_FIELD, TEXT_FIELD};
use relaychat_core::models::{ChatReply, ChatRequest, ErrorBody, UploadReply};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ClientError, Result};

const CHAT_PATH: &str = "api/chat";
const UPLOAD_PATH: &str = "api/upload";

/// Default relay location for local development.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:10000";

/// One method per relay endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base: Url,
}

impl RelayClient {
    /// Creates a client for the relay at `base_url`.
    ///
    /// A base path is kept: `http://host/chat` resolves endpoints under
    /// `http://host/chat/api/...`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// `POST /api/chat`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint(CHAT_PATH)?;
        debug!("POST {url} ({} messages)", request.messages.len());
        let resp = self.http.post(url).json(request).send().await?;
        decode(resp).await
    }

    /// `POST /api/upload` with the file at `path`.
    pub async fn upload(&self, path: &Path, text: Option<&str>) -> Result<UploadReply> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        self.upload_bytes(file_name, bytes, text).await
    }

    /// `POST /api/upload` with an in-memory file.
    pub async fn upload_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        text: Option<&str>,
    ) -> Result<UploadReply> {
        let url = self.endpoint(UPLOAD_PATH)?;
        debug!("POST {url} ({} bytes, file {file_name})", bytes.len());

        let mut form = Form::new().part(FILE_FIELD, Part::bytes(bytes).file_name(file_name));
        if let Some(text) = text {
            form = form.text(TEXT_FIELD, text.to_string());
        }

        let resp = self.http.post(url).multipart(form).send().await?;
        decode(resp).await
    }
}

/// Decodes a success body, or turns the relay's error body into
/// [`ClientError::Relay`].
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Relay {
        status: status.as_u16(),
        message,
    })
}
