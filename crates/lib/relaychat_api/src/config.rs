//! Relay configuration.
//!
//! Built once at process start and handed to the router inside
//! [`AppState`](crate::AppState). Handlers never read the environment.

use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use relaychat_core::upstream::{
    DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_SIZE, OpenAiUpstream,
};
use thiserror::Error;
use tower_http::cors::AllowOrigin;

/// Default request body limit for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while building a [`RelayConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid allowed origin: {0}")]
    InvalidOrigin(String),
}

/// Browser origin permitted to call the relay cross-origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    /// `*`: any origin.
    Any,
    Exact(HeaderValue),
}

impl AllowedOrigin {
    pub fn to_cors(&self) -> AllowOrigin {
        match self {
            AllowedOrigin::Any => AllowOrigin::any(),
            AllowedOrigin::Exact(origin) => AllowOrigin::exact(origin.clone()),
        }
    }
}

impl FromStr for AllowedOrigin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(AllowedOrigin::Any);
        }
        let valid_scheme = s.starts_with("http://") || s.starts_with("https://");
        if !valid_scheme || s.ends_with('/') {
            return Err(ConfigError::InvalidOrigin(s.to_string()));
        }
        HeaderValue::from_str(s)
            .map(AllowedOrigin::Exact)
            .map_err(|_| ConfigError::InvalidOrigin(s.to_string()))
    }
}

impl std::fmt::Display for AllowedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllowedOrigin::Any => f.write_str("*"),
            AllowedOrigin::Exact(origin) => f.write_str(origin.to_str().unwrap_or("<invalid>")),
        }
    }
}

/// Configuration for the relay server.
///
/// | Field              | Default                      |
/// |--------------------|------------------------------|
/// | `bind_addr`        | `127.0.0.1:10000`            |
/// | `openai_base_url`  | `https://api.openai.com`     |
/// | `chat_model`       | `gpt-3.5-turbo`              |
/// | `image_size`       | `512x512`                    |
/// | `allowed_origin`   | `http://localhost:3000`      |
/// | `upload_dir`       | `<tmp>/relaychat-uploads`    |
/// | `max_upload_bytes` | 10 MiB                       |
///
/// `openai_api_key` has no default.
#[derive(Clone)]
pub struct RelayConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:10000").
    pub bind_addr: String,
    /// Credential injected into every upstream request. Never sent to clients.
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub image_size: String,
    pub allowed_origin: AllowedOrigin,
    /// Directory holding staged uploads for the lifetime of one request.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl RelayConfig {
    /// Configuration with every default applied around `openai_api_key`.
    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:10000".into(),
            openai_api_key: openai_api_key.into(),
            openai_base_url: DEFAULT_BASE_URL.into(),
            chat_model: DEFAULT_CHAT_MODEL.into(),
            image_size: DEFAULT_IMAGE_SIZE.into(),
            allowed_origin: AllowedOrigin::Exact(HeaderValue::from_static(
                "http://localhost:3000",
            )),
            upload_dir: default_upload_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Builds the upstream provider described by this configuration.
    pub fn upstream(&self) -> OpenAiUpstream {
        OpenAiUpstream::new(self.openai_api_key.clone())
            .with_base_url(self.openai_base_url.clone())
            .with_chat_model(self.chat_model.clone())
            .with_image_size(self.image_size.clone())
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bind_addr", &self.bind_addr)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("image_size", &self.image_size)
            .field("allowed_origin", &self.allowed_origin)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

/// `<system temp dir>/relaychat-uploads`.
pub fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("relaychat-uploads")
}
