//! File upload endpoint.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::routes::multipart::MultipartForm;
use crate::services::UploadError;
use crate::state::AppState;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// `{success, filePath, fileName}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_path: String,
    pub file_name: String,
}

/// Store an uploaded file under a generated name.
///
/// POST /api/upload
///
/// The file is kept even if the caller never registers it.
#[instrument(skip(admin, state, multipart), fields(admin = %admin.username))]
pub async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let form = MultipartForm::read(multipart).await?;
    let file = form.file(FILE_FIELD).ok_or(UploadError::Empty)?;

    let stored = state.uploads().save(&file.file_name, &file.bytes).await?;

    Ok(Json(UploadResponse {
        success: true,
        file_path: stored.public_path,
        file_name: stored.file_name,
    }))
}
