//! Product listing and detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::filters;
use crate::models::Product;
use crate::state::AppState;

use super::NotFoundTemplate;

/// Products sharing a category, for the listing page.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub name: String,
    pub products: Vec<Product>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub groups: Vec<CategoryGroup>,
    /// Every product, shown as a final section when there is more than one group.
    pub all_products: Vec<Product>,
}

impl ProductsIndexTemplate {
    #[must_use]
    pub fn show_all(&self) -> bool {
        self.groups.len() > 1
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
}

/// Group products by category, keeping categories in first-seen order.
#[must_use]
pub fn group_by_category(products: &[Product]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for product in products {
        let category = product.display_category();
        match groups.iter_mut().find(|g| g.name == category) {
            Some(group) => group.products.push(product.clone()),
            None => groups.push(CategoryGroup {
                name: category.to_owned(),
                products: vec![product.clone()],
            }),
        }
    }

    groups
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let products = state.products().list().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load products: {e}");
        Vec::new()
    });

    ProductsIndexTemplate {
        groups: group_by_category(&products),
        all_products: products,
    }
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.products().get_by_slug(&slug).await {
        Ok(Some(product)) => ProductShowTemplate { product }.into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, NotFoundTemplate::product()).into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, "Failed to load product: {e}");
            (StatusCode::NOT_FOUND, NotFoundTemplate::product()).into_response()
        }
    }
}
