//! Route paths served by the relay.

pub const POST_API_CHAT: &str = "/api/chat";
pub const POST_API_UPLOAD: &str = "/api/upload";
pub const GET_API_HEALTH: &str = "/api/health";
