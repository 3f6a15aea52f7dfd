//! Contact message repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rmt_core::{ContactId, ContactStatus, Email};

use super::RepositoryError;
use crate::models::contact::{ContactMessage, NewContact};

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    company: Option<String>,
    subject: Option<String>,
    message: String,
    status: ContactStatus,
    created_at: DateTime<Utc>,
    application_name: String,
}

impl TryFrom<ContactRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            company: row.company,
            subject: row.subject,
            message: row.message,
            status: row.status,
            created_at: row.created_at,
            application_name: row.application_name,
        })
    }
}

/// Repository for contact messages, scoped to one application.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
    scope: &'a str,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, scope: &'a str) -> Self {
        Self { pool, scope }
    }

    /// Store a submitted message with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, contact: &NewContact) -> Result<ContactId, RepositoryError> {
        let id = ContactId::generate();
        sqlx::query(
            r"
            INSERT INTO site.contact
                (id, application_name, name, email, phone, company, subject, message, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(id)
        .bind(self.scope)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.company)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(ContactStatus::New)
        .execute(self.pool)
        .await?;

        Ok(id)
    }

    /// List messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn list(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactRow>(
            r"
            SELECT id, name, email, phone, company, subject, message, status,
                   created_at, application_name
            FROM site.contact
            WHERE application_name = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(self.scope)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Change a message's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no message has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_status(
        &self,
        id: ContactId,
        status: ContactStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE site.contact SET status = $3 WHERE id = $1 AND application_name = $2",
        )
        .bind(id)
        .bind(self.scope)
        .bind(status)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count messages, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, status: Option<ContactStatus>) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM site.contact
            WHERE application_name = $1 AND ($2::site.contact_status IS NULL OR status = $2)
            ",
        )
        .bind(self.scope)
        .bind(status)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}
