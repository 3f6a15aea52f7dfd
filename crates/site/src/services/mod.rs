//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Admin username/password authentication
//! - `uploads` - Writing and removing uploaded files

pub mod auth;
pub mod uploads;

pub use auth::{AuthError, AuthService};
pub use uploads::{StoredUpload, UploadError, UploadStore};
