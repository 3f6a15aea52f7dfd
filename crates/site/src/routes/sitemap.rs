//! Human-readable sitemap page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::models::Product;
use crate::state::AppState;

/// Fixed pages listed before the products.
pub const STATIC_PAGES: &[(&str, &str)] = &[
    ("Home", "/"),
    ("Products", "/products"),
    ("Contact", "/contact"),
];

/// Sitemap page template.
#[derive(Template, WebTemplate)]
#[template(path = "sitemap.html")]
pub struct SitemapTemplate {
    pub pages: &'static [(&'static str, &'static str)],
    pub products: Vec<Product>,
}

/// Display the sitemap.
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let products = state.products().list().await.unwrap_or_else(|e| {
        tracing::error!("Failed to load products for sitemap: {e}");
        Vec::new()
    });

    SitemapTemplate {
        pages: STATIC_PAGES,
        products,
    }
}
