//! Product REST endpoints.
//!
//! Reads are public; writes require an admin session.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use rmt_core::ProductId;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{Product, ProductDraft, ProductUpdate};
use crate::state::AppState;

use super::{ApiJson, SuccessResponse};

const NOT_FOUND: &str = "Product not found";

/// `{success, products}`
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

/// `{success, product}`
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// `{success, productId, product}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatedResponse {
    pub success: bool,
    pub product_id: ProductId,
    pub product: Product,
}

/// Parse a path id; anything that is not a UUID cannot name a product.
fn product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(NOT_FOUND.to_string()),
        other => other.into(),
    }
}

/// List every product in scope.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<ProductListResponse>> {
    let products = state.products().list().await?;
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .products()
        .get_by_id(product_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// GET /api/products/slug/{slug}
#[instrument(skip(state))]
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .products()
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Create a product.
///
/// POST /api/products
///
/// # Errors
///
/// 400 on validation failure, 409 if the slug is taken.
#[instrument(skip(admin, state, draft), fields(admin = %admin.username))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> Result<Json<ProductCreatedResponse>> {
    let new_product = draft.validate()?;
    let product = state.products().create(&new_product).await?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");

    Ok(Json(ProductCreatedResponse {
        success: true,
        product_id: product.id,
        product,
    }))
}

/// Overwrite the submitted fields of a product.
///
/// PUT /api/products/{id}
#[instrument(skip(admin, state, update), fields(admin = %admin.username))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> Result<Json<ProductResponse>> {
    let id = product_id(&id)?;
    let changes = update.validate()?;
    let product = state
        .products()
        .update(id, changes)
        .await
        .map_err(not_found)?;

    tracing::info!(product_id = %product.id, "Product updated");

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// DELETE /api/products/{id}
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let id = product_id(&id)?;
    state.products().delete(id).await.map_err(not_found)?;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(SuccessResponse { success: true }))
}
