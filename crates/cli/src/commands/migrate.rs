//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rmt-cli migrate
//! ```
//!
//! Applies the SQL files in `crates/site/migrations/` (embedded at build
//! time) to the database named by `SITE_DATABASE_URL`.

use rmt_site::db;

/// Run the site migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let target = super::connect().await?;

    tracing::info!("Running site migrations...");
    db::run_migrations(&target.pool).await?;

    tracing::info!("Site migrations complete!");
    Ok(())
}
