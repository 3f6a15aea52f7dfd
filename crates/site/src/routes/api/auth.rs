//! Admin login/logout over JSON.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::{ApiJson, SuccessResponse};

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `{success, user}`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: CurrentAdmin,
}

/// Check credentials and start an admin session.
///
/// POST /api/auth/login
///
/// Unknown username and wrong password both yield 401 "Invalid credentials".
#[instrument(skip(state, session, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let admin = match state
        .auth()
        .login(&req.username, &req.password)
        .await
    {
        Ok(admin) => admin,
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            return Err(e.into());
        }
    };

    let user = CurrentAdmin::from(&admin);
    set_current_admin(&session, &user).await?;
    set_sentry_user(&user.id, &user.username);

    tracing::info!(admin_id = %user.id, "Admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        user,
    }))
}

/// End the current session.
///
/// POST /api/auth/logout
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<SuccessResponse>> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Json(SuccessResponse { success: true }))
}
