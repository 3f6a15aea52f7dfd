//! Domain models for the site.

pub mod admin_user;
pub mod contact;
pub mod media;
pub mod product;
pub mod session;

pub use admin_user::AdminUser;
pub use contact::{ContactMessage, ContactSubmission, ContactValidationError, NewContact};
pub use media::{MediaItem, NewMedia};
pub use product::{
    NewProduct, Product, ProductChanges, ProductDraft, ProductUpdate, ProductValidationError,
    Specification,
};
pub use session::{CurrentAdmin, keys as session_keys};
