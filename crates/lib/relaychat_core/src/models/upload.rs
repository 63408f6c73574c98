//! Image upload models.

use serde::{Deserialize, Serialize};

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Optional multipart field carrying the prompt.
pub const TEXT_FIELD: &str = "text";

/// Prompt used when an upload arrives without a `text` field.
pub const DEFAULT_UPLOAD_PROMPT: &str = "Create a creative variation of the uploaded image.";

/// `POST /api/upload` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReply {
    pub reply: String,
    pub image_url: String,
}
