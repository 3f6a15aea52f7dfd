//! First-run admin seeding.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::AuthError;
use crate::state::AppState;

/// Username of the seeded account.
pub const SEED_USERNAME: &str = "admin";

/// `{success, message}`
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
}

/// Create the default `admin` account.
///
/// POST /api/seed
///
/// 403 when no seed password is configured, 409 when the account exists.
#[instrument(skip(state))]
pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>> {
    let Some(password) = state.config().seed_admin_password.as_ref() else {
        return Err(AppError::Forbidden("Seeding is disabled".to_string()));
    };

    state
        .auth()
        .create_admin(SEED_USERNAME, password.expose_secret())
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => AppError::Conflict("Admin user already exists".to_string()),
            other => other.into(),
        })?;

    tracing::info!(username = SEED_USERNAME, "Seeded admin user");

    Ok(Json(SeedResponse {
        success: true,
        message: "Admin user created".to_string(),
    }))
}
