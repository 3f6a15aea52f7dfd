//! Media library page.

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    response::{Html, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use rmt_core::MediaId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{MediaItem, NewMedia};
use crate::routes::api::media::delete_media;
use crate::routes::multipart::{MultipartForm, UploadedFile};
use crate::state::AppState;

use super::{AdminUserView, form_error, render, set_flash, take_flash};

/// Multipart field carrying the files.
const FILES_FIELD: &str = "files";

/// Media page template.
#[derive(Template)]
#[template(path = "admin/media.html")]
pub struct MediaTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<String>,
    pub media: Vec<MediaItem>,
    pub error: Option<String>,
}

/// Media page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let (media, error) = match state.media().list().await {
        Ok(media) => (media, None),
        Err(e) => {
            tracing::error!("Failed to fetch media: {e}");
            (Vec::new(), Some("Failed to load media".to_string()))
        }
    };

    render(&MediaTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admin/media".to_string(),
        flash: take_flash(&session).await,
        media,
        error,
    })
}

/// Store one file and register it in the library.
async fn upload_one(state: &AppState, file: &UploadedFile) -> Result<MediaItem, AppError> {
    let stored = state.uploads().save(&file.file_name, &file.bytes).await?;
    let media = NewMedia {
        url: stored.public_path,
        resource_type: file.kind(),
        filename: stored.file_name,
    };
    Ok(state.media().create(&media).await?)
}

/// Upload handler.
///
/// Files are processed one at a time in submission order. The first failure
/// stops the batch; files already stored stay registered.
#[instrument(skip(admin, state, session, multipart))]
pub async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Redirect {
    let files = match MultipartForm::read(multipart).await {
        Ok(mut form) => form.take_files(FILES_FIELD),
        Err(e) => {
            set_flash(&session, format!("Upload failed: {}", form_error(&e))).await;
            return Redirect::to("/admin/media");
        }
    };

    if files.is_empty() {
        set_flash(&session, "No file uploaded").await;
        return Redirect::to("/admin/media");
    }

    let total = files.len();
    let mut uploaded = 0;
    for file in &files {
        match upload_one(&state, file).await {
            Ok(media) => {
                tracing::info!(media_id = %media.id, admin = %admin.username, "Media uploaded");
                uploaded += 1;
            }
            Err(e) => {
                let message = format!(
                    "Uploaded {uploaded} of {total}; {} failed: {}",
                    file.file_name,
                    form_error(&e)
                );
                set_flash(&session, message).await;
                return Redirect::to("/admin/media");
            }
        }
    }

    set_flash(&session, format!("Uploaded {uploaded} file(s)")).await;
    Redirect::to("/admin/media")
}

/// Delete handler.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Redirect {
    let result = match MediaId::parse(&id) {
        Some(id) => delete_media(&state, id).await,
        None => Err(AppError::NotFound("Media not found".to_string())),
    };

    match result {
        Ok(media) => {
            tracing::info!(media_id = %media.id, admin = %admin.username, "Media deleted from admin");
            set_flash(&session, "Media deleted").await;
        }
        Err(e) => set_flash(&session, format!("Delete failed: {}", form_error(&e))).await,
    }

    Redirect::to("/admin/media")
}
