//! Media repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rmt_core::{MediaId, MediaKind};

use super::RepositoryError;
use crate::models::media::{MediaItem, NewMedia};

#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    id: Uuid,
    url: String,
    resource_type: MediaKind,
    filename: String,
    created_at: DateTime<Utc>,
    application_name: String,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        Self {
            id: MediaId::new(row.id),
            url: row.url,
            resource_type: row.resource_type,
            filename: row.filename,
            created_at: row.created_at,
            application_name: row.application_name,
        }
    }
}

/// Repository for media database operations, scoped to one application.
pub struct MediaRepository<'a> {
    pool: &'a PgPool,
    scope: &'a str,
}

impl<'a> MediaRepository<'a> {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, scope: &'a str) -> Self {
        Self { pool, scope }
    }

    /// List media items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<MediaItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MediaRow>(
            r"
            SELECT id, url, resource_type, filename, created_at, application_name
            FROM site.media
            WHERE application_name = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(self.scope)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a media item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: MediaId) -> Result<Option<MediaItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MediaRow>(
            r"
            SELECT id, url, resource_type, filename, created_at, application_name
            FROM site.media
            WHERE id = $1 AND application_name = $2
            ",
        )
        .bind(id)
        .bind(self.scope)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Register a media item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, media: &NewMedia) -> Result<MediaItem, RepositoryError> {
        let row = sqlx::query_as::<_, MediaRow>(
            r"
            INSERT INTO site.media (id, application_name, url, resource_type, filename)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, url, resource_type, filename, created_at, application_name
            ",
        )
        .bind(MediaId::generate())
        .bind(self.scope)
        .bind(&media.url)
        .bind(media.resource_type)
        .bind(&media.filename)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete a media record, returning what was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no media item has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: MediaId) -> Result<MediaItem, RepositoryError> {
        let row = sqlx::query_as::<_, MediaRow>(
            r"
            DELETE FROM site.media
            WHERE id = $1 AND application_name = $2
            RETURNING id, url, resource_type, filename, created_at, application_name
            ",
        )
        .bind(id)
        .bind(self.scope)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Count media items in scope.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM site.media WHERE application_name = $1")
                .bind(self.scope)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
