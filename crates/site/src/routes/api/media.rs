//! Media library REST endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use rmt_core::MediaId;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{MediaItem, NewMedia};
use crate::state::AppState;

use super::{ApiJson, SuccessResponse};

const NOT_FOUND: &str = "Media not found";

/// `{success, mediaId, media}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCreatedResponse {
    pub success: bool,
    pub media_id: MediaId,
    pub media: MediaItem,
}

/// List media, newest first. The body is a bare JSON array.
///
/// GET /api/media
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<MediaItem>>> {
    Ok(Json(state.media().list().await?))
}

/// Register an already-uploaded file in the media library.
///
/// POST /api/media
#[instrument(skip(admin, state, media), fields(admin = %admin.username))]
pub async fn register(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(media): ApiJson<NewMedia>,
) -> Result<Json<MediaCreatedResponse>> {
    if media.url.trim().is_empty() {
        return Err(AppError::BadRequest("Url is required".to_string()));
    }

    let media = state.media().create(&media).await?;
    tracing::info!(media_id = %media.id, url = %media.url, "Media registered");

    Ok(Json(MediaCreatedResponse {
        success: true,
        media_id: media.id,
        media,
    }))
}

/// Delete a media record and, when it lives in the upload directory, its file.
///
/// DELETE /api/media/{id}
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let id = MediaId::parse(&id).ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    delete_media(&state, id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Remove a media record, then its uploaded file on a best-effort basis.
///
/// Shared with the admin media page.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no record has this ID.
pub async fn delete_media(state: &AppState, id: MediaId) -> Result<MediaItem> {
    let media = state.media().delete(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound(NOT_FOUND.to_string()),
        other => other.into(),
    })?;

    match state.uploads().remove_by_url(&media.url).await {
        Ok(removed) => {
            tracing::info!(media_id = %media.id, file_removed = removed, "Media deleted");
        }
        Err(e) => {
            tracing::warn!(media_id = %media.id, url = %media.url, error = %e, "Media deleted but file removal failed");
        }
    }

    Ok(media)
}
