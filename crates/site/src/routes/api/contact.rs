//! Contact message endpoints.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use rmt_core::ContactId;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::{ContactMessage, ContactSubmission};
use crate::state::AppState;

use super::ApiJson;

/// `{success, contactId}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreatedResponse {
    pub success: bool,
    pub contact_id: ContactId,
}

/// `{success, contacts}`
#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub success: bool,
    pub contacts: Vec<ContactMessage>,
}

/// Store a contact message. Subject is optional here.
///
/// POST /api/contact
#[instrument(skip(state, submission))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<ContactSubmission>,
) -> Result<Json<ContactCreatedResponse>> {
    let contact = submission.validate(false)?;
    let contact_id = state.contacts().create(&contact).await?;

    tracing::info!(contact_id = %contact_id, "Contact message received");

    Ok(Json(ContactCreatedResponse {
        success: true,
        contact_id,
    }))
}

/// List contact messages, newest first.
///
/// GET /api/contact
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn list(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ContactListResponse>> {
    let contacts = state.contacts().list().await?;
    Ok(Json(ContactListResponse {
        success: true,
        contacts,
    }))
}
