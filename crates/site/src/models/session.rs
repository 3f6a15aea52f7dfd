//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use rmt_core::AdminUserId;

use super::admin_user::AdminUser;

/// Session-stored admin identity.
///
/// Also the `user` object returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's login name.
    pub username: String,
    /// Scope the admin belongs to.
    pub application_name: String,
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            application_name: user.application_name.clone(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for a one-shot flash message shown on the next admin page.
    pub const FLASH: &str = "flash";
}
