//! Image upload relay handler.
//!
//! The uploaded file is staged on disk for the duration of the request only.
//! The upstream call itself carries just the prompt.

use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use relaychat_core::models::UploadReply;
use relaychat_core::models::upload::{DEFAULT_UPLOAD_PROMPT, FILE_FIELD, TEXT_FIELD};
use relaychat_core::upload::StagedUpload;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};

pub const NO_FILE_MESSAGE: &str = "No file uploaded.";

/// Fields collected from one multipart body.
#[derive(Default)]
struct UploadForm {
    file: Option<StagedUpload>,
    text: Option<String>,
}

/// `POST /api/upload`: stage the file, generate one image from the prompt,
/// and return an acknowledgment with the image URL.
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadReply>> {
    // A body that is not multipart cannot carry a file field.
    let mut multipart = multipart.map_err(|_| AppError::Validation(NO_FILE_MESSAGE.into()))?;

    let form = read_form(&mut multipart, &state.config.upload_dir).await?;
    let staged = form
        .file
        .ok_or_else(|| AppError::Validation(NO_FILE_MESSAGE.into()))?;

    let prompt = form
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_PROMPT.to_string());

    info!(
        bytes = staged.len(),
        name = staged.original_name().unwrap_or("<unnamed>"),
        "staged upload"
    );

    let generated = state.upstream.generate_image(&prompt).await;

    if let Err(e) = staged.discard() {
        warn!(error = %e, "failed to remove staged upload");
    }

    let image_url = generated?;

    Ok(Json(UploadReply {
        reply: format!("Here is an image generated for: {prompt}"),
        image_url,
    }))
}

/// Reads every field, staging the first `file` field and keeping the first
/// `text` field. Other fields are ignored.
async fn read_form(multipart: &mut Multipart, upload_dir: &Path) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) if form.file.is_none() => {
                let original_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?;
                let dir = upload_dir.to_path_buf();
                let staged = tokio::task::spawn_blocking(move || {
                    StagedUpload::stage(&dir, original_name.as_deref(), &bytes)
                })
                .await??;
                debug!(path = %staged.path().display(), "upload written");
                form.file = Some(staged);
            }
            Some(TEXT_FIELD) if form.text.is_none() => {
                form.text = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(form)
}
