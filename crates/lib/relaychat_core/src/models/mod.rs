//! Wire models shared by the relay and its clients.

pub mod chat;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use chat::{ChatMessage, ChatReply, ChatRequest, Role};
pub use upload::UploadReply;

/// Body of every non-2xx relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `GET /api/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
