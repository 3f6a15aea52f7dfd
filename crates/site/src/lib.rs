//! RMT Site - marketing pages, catalog admin panel and REST API.
//!
//! # Architecture
//!
//! - Axum web framework with server-rendered Askama templates
//! - `PostgreSQL` (sqlx) for products, media, contact messages and admins
//! - tower-sessions with a `PostgreSQL` store for admin sessions
//! - Uploaded files on the local filesystem, served at `/uploads`
//!
//! Every record carries an application-name scope tag and every query filters
//! on the configured scope, so several sites can share one database.
//!
//! The library exposes [`routes::app`] so the binary and the integration
//! tests build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::SiteConfig;
pub use error::AppError;
pub use state::AppState;
