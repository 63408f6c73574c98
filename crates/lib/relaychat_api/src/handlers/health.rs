//! Liveness endpoint.

use axum::Json;
use relaychat_core::models::HealthResponse;

/// `GET /api/health`: reports that the relay is up. Never calls upstream.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: relaychat_core::version().to_string(),
    })
}
