//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use rmt_core::{ProductId, Slug};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductChanges, Specification, next_updated_at};

const PRODUCT_COLUMNS: &str = "id, name, slug, category, short_description, description, \
     image_url, gallery_urls, key_features, specifications, is_featured, sort_order, \
     created_at, updated_at, application_name";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    slug: String,
    category: String,
    short_description: String,
    description: String,
    image_url: String,
    gallery_urls: Vec<String>,
    key_features: Vec<String>,
    specifications: Json<Vec<Specification>>,
    is_featured: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    application_name: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let slug = Slug::parse(&row.slug).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid slug in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug,
            category: row.category,
            short_description: row.short_description,
            description: row.description,
            image_url: row.image_url,
            gallery_urls: row.gallery_urls,
            key_features: row.key_features,
            specifications: row.specifications.0,
            is_featured: row.is_featured,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
            application_name: row.application_name,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations, scoped to one application.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
    scope: &'a str,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool, scope: &'a str) -> Self {
        Self { pool, scope }
    }

    /// List all products, ordered by sort position then creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product \
             WHERE application_name = $1 \
             ORDER BY sort_order ASC, created_at ASC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(self.scope)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List featured products in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product \
             WHERE application_name = $1 AND is_featured \
             ORDER BY sort_order ASC, created_at ASC"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(self.scope)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product \
             WHERE id = $1 AND application_name = $2"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(self.scope)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product \
             WHERE slug = $1 AND application_name = $2"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(slug)
            .bind(self.scope)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO site.product \
                 (id, application_name, name, slug, category, short_description, description, \
                  image_url, gallery_urls, key_features, specifications, is_featured, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(ProductId::generate())
            .bind(self.scope)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.category)
            .bind(&product.short_description)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.gallery_urls)
            .bind(&product.key_features)
            .bind(Json(&product.specifications))
            .bind(product.is_featured)
            .bind(product.order)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique_violation(e, "slug"))?;

        row.try_into()
    }

    /// Apply `changes` to a product and advance its `updated_at`.
    ///
    /// The row is locked for the duration of the read-modify-write so
    /// concurrent updates serialize and each sees a strictly later timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Conflict` if the new slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product \
             WHERE id = $1 AND application_name = $2 \
             FOR UPDATE"
        );
        let current: Product = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(self.scope)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .try_into()?;

        let mut product = current.clone();
        changes.apply(&mut product);
        let updated_at = next_updated_at(current.updated_at, Utc::now());

        let sql = format!(
            "UPDATE site.product SET \
                 name = $3, slug = $4, category = $5, short_description = $6, \
                 description = $7, image_url = $8, gallery_urls = $9, key_features = $10, \
                 specifications = $11, is_featured = $12, sort_order = $13, updated_at = $14 \
             WHERE id = $1 AND application_name = $2 \
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(self.scope)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.category)
            .bind(&product.short_description)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.gallery_urls)
            .bind(&product.key_features)
            .bind(Json(&product.specifications))
            .bind(product.is_featured)
            .bind(product.order)
            .bind(updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_unique_violation(e, "slug"))?;

        tx.commit().await?;
        row.try_into()
    }

    /// Delete a product. Referenced media files are left in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM site.product WHERE id = $1 AND application_name = $2")
                .bind(id)
                .bind(self.scope)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count products in scope.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM site.product WHERE application_name = $1")
                .bind(self.scope)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
