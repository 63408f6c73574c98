//! Shared fixtures: a recording stub upstream and request helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use relaychat_api::AppState;
use relaychat_api::config::RelayConfig;
use relaychat_core::models::ChatMessage;
use relaychat_core::upstream::{Upstream, UpstreamError};
use tower::ServiceExt;

pub const BOUNDARY: &str = "relaychat-test-boundary";

/// Upstream that answers from canned values and records what it was sent.
#[derive(Default)]
pub struct StubUpstream {
    pub reply: Option<String>,
    pub image_url: Option<String>,
    /// Directory whose entry count is sampled during `generate_image`.
    pub watch_dir: Option<PathBuf>,
    pub files_during_call: AtomicUsize,
    pub chats: Mutex<Vec<Vec<ChatMessage>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubUpstream {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn imaging(url: &str, watch_dir: &Path) -> Self {
        Self {
            image_url: Some(url.to_string()),
            watch_dir: Some(watch_dir.to_path_buf()),
            ..Self::default()
        }
    }

    /// Fails every call.
    pub fn failing(watch_dir: &Path) -> Self {
        Self {
            watch_dir: Some(watch_dir.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn chat_calls(&self) -> usize {
        self.chats.lock().unwrap().len()
    }
}

fn failure() -> UpstreamError {
    UpstreamError::Status {
        status: 503,
        body: "upstream secret diagnostic".into(),
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, UpstreamError> {
        self.chats.lock().unwrap().push(messages.to_vec());
        self.reply.clone().ok_or_else(failure)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(dir) = &self.watch_dir {
            self.files_during_call
                .store(count_files(dir), Ordering::SeqCst);
        }
        self.image_url.clone().ok_or_else(failure)
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

fn test_config(upload_dir: &Path) -> RelayConfig {
    let mut config = RelayConfig::new("sk-test-key");
    config.upload_dir = upload_dir.to_path_buf();
    config.allowed_origin = "http://localhost:3000".parse().unwrap();
    config
}

pub fn app(stub: Arc<StubUpstream>, upload_dir: &Path) -> Router {
    relaychat_api::router(AppState::with_upstream(test_config(upload_dir), stub))
}

/// Like [`app`], with request bodies capped at `max_bytes`.
pub fn app_with_limit(stub: Arc<StubUpstream>, upload_dir: &Path, max_bytes: usize) -> Router {
    let mut config = test_config(upload_dir);
    config.max_upload_bytes = max_bytes;
    relaychat_api::router(AppState::with_upstream(config, stub))
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// One multipart part: `(name, optional filename, content)`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a str);

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
