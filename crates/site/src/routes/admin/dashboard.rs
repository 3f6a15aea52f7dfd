//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tower_sessions::Session;
use tracing::instrument;

use rmt_core::ContactStatus;

use crate::{db::RepositoryError, filters, middleware::RequireAdminAuth, state::AppState};

use super::{AdminUserView, render, take_flash};

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardCounts {
    pub products: i64,
    pub media: i64,
    pub contacts: i64,
    pub new_contacts: i64,
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<String>,
    pub counts: DashboardCounts,
}

fn or_zero(what: &str, result: Result<i64, RepositoryError>) -> i64 {
    result.unwrap_or_else(|e| {
        tracing::error!("Failed to count {what}: {e}");
        0
    })
}

/// Dashboard page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let (product_repo, media_repo, contact_repo) =
        (state.products(), state.media(), state.contacts());
    let (products, media, contacts, new_contacts) = tokio::join!(
        product_repo.count(),
        media_repo.count(),
        contact_repo.count(None),
        contact_repo.count(Some(ContactStatus::New)),
    );

    let counts = DashboardCounts {
        products: or_zero("products", products),
        media: or_zero("media", media),
        contacts: or_zero("contacts", contacts),
        new_contacts: or_zero("new contacts", new_contacts),
    };

    render(&DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/admin".to_string(),
        flash: take_flash(&session).await,
        counts,
    })
}
