//! Admin panel pages.
//!
//! Server-rendered HTML forms over the same repositories and services as the
//! JSON API. Every page except login takes [`RequireAdminAuth`], which sends
//! visitors without a session to `/admin/login`.
//!
//! [`RequireAdminAuth`]: crate::middleware::RequireAdminAuth

pub mod auth;
pub mod contacts;
pub mod dashboard;
pub mod media;
pub mod products;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::auth_rate_limiter;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub username: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            username: admin.username.clone(),
        }
    }
}

/// Render an admin template, logging instead of failing the request.
pub(crate) fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Queue a one-shot notice for the next admin page.
pub(crate) async fn set_flash(session: &Session, message: impl Into<String>) {
    if let Err(e) = session.insert(session_keys::FLASH, message.into()).await {
        tracing::warn!("Failed to store flash message: {e}");
    }
}

/// Take the pending notice, if any.
pub(crate) async fn take_flash(session: &Session) -> Option<String> {
    session
        .remove::<String>(session_keys::FLASH)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read flash message: {e}");
            None
        })
}

/// Message to show in a form after a failed save.
///
/// Internal failures are logged and reported generically.
pub(crate) fn form_error(err: &AppError) -> String {
    if err.is_internal() {
        tracing::error!(error = %err, "Admin action failed");
    }
    err.public_message()
}

/// Create the admin product routes router.
fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/new", get(products::new_product).post(products::create))
        .route("/{id}/edit", get(products::edit).post(products::update))
        .route("/{id}/delete", post(products::delete))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}

/// Create the admin media routes router.
fn media_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(media::index).post(media::upload))
        .route("/{id}/delete", post(media::delete))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}

/// Create all admin routes, mounted at `/admin`.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
        .nest("/products", product_routes(max_upload_bytes))
        .nest("/media", media_routes(max_upload_bytes))
        .route("/contacts", get(contacts::index))
        .route("/contacts/{id}/status", post(contacts::set_status))
}
