//! Contact messages page.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use rmt_core::{ContactId, ContactStatus};

use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::ContactMessage;
use crate::state::AppState;

use super::{AdminUserView, render, set_flash, take_flash};

/// Contacts page template.
#[derive(Template)]
#[template(path = "admin/contacts.html")]
pub struct ContactsTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<String>,
    pub contacts: Vec<ContactMessage>,
    pub error: Option<String>,
}

/// Status change form input.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: ContactStatus,
}

/// Contacts page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let (contacts, error) = match state.contacts().list().await {
        Ok(contacts) => (contacts, None),
        Err(e) => {
            tracing::error!("Failed to fetch contacts: {e}");
            (Vec::new(), Some("Failed to load messages".to_string()))
        }
    };

    render(&ContactsTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admin/contacts".to_string(),
        flash: take_flash(&session).await,
        contacts,
        error,
    })
}

/// Mark a message new, read or archived.
#[instrument(skip(admin, state, session))]
pub async fn set_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let Some(contact_id) = ContactId::parse(&id) else {
        set_flash(&session, "Message not found").await;
        return Redirect::to("/admin/contacts");
    };

    match state.contacts().set_status(contact_id, form.status).await {
        Ok(()) => {
            tracing::info!(contact_id = %contact_id, status = %form.status, admin = %admin.username, "Contact status changed");
        }
        Err(e) => {
            tracing::warn!(contact_id = %contact_id, error = %e, "Failed to change contact status");
            set_flash(&session, "Could not update message").await;
        }
    }

    Redirect::to("/admin/contacts")
}
