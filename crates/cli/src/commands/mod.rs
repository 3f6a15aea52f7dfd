//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use rmt_site::db;
use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connection settings read from the environment.
pub struct Target {
    pub pool: PgPool,
    pub scope: String,
}

/// Connect to the site database named by `SITE_DATABASE_URL` (or
/// `DATABASE_URL`) and read the scope from `SITE_APPLICATION_NAME`.
///
/// # Errors
///
/// Returns `CommandError` if no database URL is set or the connection fails.
pub async fn connect() -> Result<Target, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("SITE_DATABASE_URL"))?;

    let scope = std::env::var("SITE_APPLICATION_NAME")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "rmt".to_string());

    tracing::info!("Connecting to site database...");
    let pool = db::create_pool(&database_url).await?;

    Ok(Target { pool, scope })
}
