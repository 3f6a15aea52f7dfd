//! Admin user domain types.

use chrono::{DateTime, Utc};

use rmt_core::AdminUserId;

/// An admin account (domain type).
///
/// The password hash never leaves the server; use
/// [`CurrentAdmin`](super::CurrentAdmin) for anything serialized.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login name, unique per application scope.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// Scope tag.
    pub application_name: String,
}
