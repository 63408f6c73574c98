//! # relaychat_api
//!
//! HTTP relay library for relaychat.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::routing::{get, post};
use relaychat_core::upstream::Upstream;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::RelayConfig;
use crate::handlers::{chat, health, upload};

/// Shared application state passed to all handlers.
///
/// Immutable for the lifetime of the process; handlers share it without locks.
#[derive(Clone)]
pub struct AppState {
    /// Relay configuration.
    pub config: Arc<RelayConfig>,
    /// Provider every request is forwarded to.
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    /// State whose upstream is the OpenAI-compatible provider described by `config`.
    pub fn new(config: RelayConfig) -> Self {
        let upstream = config.upstream();
        info!(
            base_url = upstream.base_url(),
            model = upstream.chat_model(),
            image_size = upstream.image_size(),
            "upstream provider"
        );
        Self::with_upstream(config, Arc::new(upstream))
    }

    pub fn with_upstream(config: RelayConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.allowed_origin.to_cors())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .route(routes::POST_API_UPLOAD, post(upload::upload_handler))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}
