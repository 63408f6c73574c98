//! Integration test: run an OpenAI-shaped stub on an ephemeral port and
//! drive `OpenAiUpstream` against it.

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use relaychat_core::models::ChatMessage;
use relaychat_core::upstream::{OpenAiUpstream, Upstream, UpstreamError};
use serde_json::{Value, json};

const KEY: &str = "sk-test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {KEY}"))
}

async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    let last = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default()
        .to_string();
    let reply = match last.as_str() {
        "2+2?" => json!({"choices": [{"message": {"role": "assistant", "content": "4"}}]}),
        "empty" => json!({"choices": []}),
        _ => json!({"choices": [{"message": {"content": format!("model={}", body["model"].as_str().unwrap_or_default())}}]}),
    };
    (StatusCode::OK, Json(reply))
}

async fn images(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    if body["n"] != 1 {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "n must be 1"})));
    }
    let url = format!(
        "https://images.example/{}/{}.png",
        body["size"].as_str().unwrap_or_default(),
        body["prompt"].as_str().unwrap_or_default().replace(' ', "-")
    );
    (StatusCode::OK, Json(json!({"created": 0, "data": [{"url": url}]})))
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .route("/v1/images/generations", post(images));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn completion_returns_first_choice_content() {
    let base = spawn_stub().await;
    let upstream = OpenAiUpstream::new(KEY).with_base_url(base);

    let reply = upstream
        .complete(&[ChatMessage::user("2+2?")])
        .await
        .expect("complete");

    assert_eq!(reply, "4");
}

#[tokio::test]
async fn completion_sends_configured_model() {
    let base = spawn_stub().await;
    let upstream = OpenAiUpstream::new(KEY)
        .with_base_url(base)
        .with_chat_model("gpt-4o-mini");

    let reply = upstream
        .complete(&[ChatMessage::system(""), ChatMessage::user("which model?")])
        .await
        .expect("complete");

    assert_eq!(reply, "model=gpt-4o-mini");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let base = spawn_stub().await;
    let upstream = OpenAiUpstream::new("sk-wrong").with_base_url(base);

    let err = upstream
        .complete(&[ChatMessage::user("2+2?")])
        .await
        .expect_err("should fail");

    match err {
        UpstreamError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad key"), "unexpected body: {body}");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let base = spawn_stub().await;
    let upstream = OpenAiUpstream::new(KEY).with_base_url(base);

    let err = upstream
        .complete(&[ChatMessage::user("empty")])
        .await
        .expect_err("should fail");

    assert!(matches!(err, UpstreamError::EmptyResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let upstream = OpenAiUpstream::new(KEY).with_base_url(format!("http://{addr}"));
    let err = upstream
        .generate_image("a cat")
        .await
        .expect_err("should fail");

    assert!(matches!(err, UpstreamError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn image_generation_returns_url() {
    let base = spawn_stub().await;
    let upstream = OpenAiUpstream::new(KEY).with_base_url(base);

    let url = upstream
        .generate_image("a red fox")
        .await
        .expect("generate");

    assert_eq!(url, "https://images.example/512x512/a-red-fox.png");
}
