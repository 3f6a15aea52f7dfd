//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! RMT_ADMIN_PASSWORD='...' rmt-cli admin create --username admin
//! ```

use rmt_site::services::{AuthError, AuthService};
use secrecy::{ExposeSecret, SecretString};

/// Create a new admin user.
///
/// # Errors
///
/// Returns an error if the username is taken, the password is too short, or
/// the database is unreachable.
pub async fn create_user(
    username: &str,
    password: &SecretString,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = super::connect().await?;
    let auth = AuthService::new(&target.pool, &target.scope);

    tracing::info!(scope = %target.scope, "Creating admin user: {username}");

    match auth.create_admin(username, password.expose_secret()).await {
        Ok(admin) => {
            tracing::info!(
                "Admin user created successfully! ID: {}, Username: {}",
                admin.id,
                admin.username
            );
            Ok(())
        }
        Err(AuthError::UserAlreadyExists) => {
            Err(format!("Admin user already exists: {username}").into())
        }
        Err(e) => Err(e.into()),
    }
}
