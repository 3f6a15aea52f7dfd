//! Admin login and logout pages.

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AuthError;
use crate::state::AppState;

use super::render;

/// Login page template.
#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<String>,
}

/// Login form input.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Display the login page, or skip to the dashboard when already signed in.
pub async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to("/admin").into_response();
    }

    render(&LoginTemplate {
        username: String::new(),
        error: None,
    })
    .into_response()
}

/// Handle the login form.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let failed = |status: StatusCode, message: &str| {
        (
            status,
            render(&LoginTemplate {
                username: form.username.clone(),
                error: Some(message.to_string()),
            }),
        )
            .into_response()
    };

    let admin = match state.auth().login(&form.username, &form.password).await {
        Ok(admin) => admin,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Admin login failed");
            return failed(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        Err(e) => {
            tracing::error!("Admin login error: {e}");
            return failed(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Login is unavailable right now",
            );
        }
    };

    let current = CurrentAdmin::from(&admin);
    if let Err(e) = set_current_admin(&session, &current).await {
        tracing::error!("Failed to store admin session: {e}");
        return failed(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Login is unavailable right now",
        );
    }
    set_sentry_user(&current.id, &current.username);

    tracing::info!(admin_id = %current.id, "Admin logged in");
    Redirect::to("/admin").into_response()
}

/// Log out and return to the login page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear admin session: {e}");
    }
    clear_sentry_user();
    Redirect::to("/admin/login")
}
