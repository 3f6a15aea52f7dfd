//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Public pages
//! GET  /                       - Home page
//! GET  /products               - Products grouped by category
//! GET  /products/{slug}        - Product detail
//! GET  /contact                - Contact form
//! POST /contact                - Submit contact form
//! GET  /sitemap                - Sitemap
//!
//! # JSON API (writes need an admin session)
//! GET    /api/products             - List products
//! POST   /api/products             - Create product
//! GET    /api/products/{id}        - Get product
//! PUT    /api/products/{id}        - Update product
//! DELETE /api/products/{id}        - Delete product
//! GET    /api/products/slug/{slug} - Get product by slug
//! GET    /api/media                - List media
//! POST   /api/media                - Register media
//! DELETE /api/media/{id}           - Delete media and its upload
//! POST   /api/upload               - Upload a file
//! GET    /api/contact              - List contact messages
//! POST   /api/contact              - Submit contact message
//! POST   /api/auth/login           - Admin login
//! POST   /api/auth/logout          - Admin logout
//! POST   /api/seed                 - Create the default admin
//!
//! # Admin pages
//! GET  /admin                        - Dashboard
//! GET  /admin/login                  - Login page
//! POST /admin/login                  - Login action
//! POST /admin/logout                 - Logout action
//! GET  /admin/products               - Product list
//! GET  /admin/products/new           - New product form
//! POST /admin/products/new           - Create product
//! GET  /admin/products/{id}/edit     - Edit product form
//! POST /admin/products/{id}/edit     - Update product
//! POST /admin/products/{id}/delete   - Delete product
//! GET  /admin/media                  - Media library
//! POST /admin/media                  - Upload media
//! POST /admin/media/{id}/delete      - Delete media
//! GET  /admin/contacts               - Contact messages
//! POST /admin/contacts/{id}/status   - Change message status
//!
//! # Files
//! GET  /uploads/*              - Uploaded files
//! GET  /static/*               - Stylesheets and images
//! ```

pub mod admin;
pub mod api;
pub mod contact;
pub mod home;
pub mod multipart;
pub mod products;
pub mod sitemap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::filters;
use crate::middleware::{
    create_session_layer, form_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub message: &'static str,
}

impl NotFoundTemplate {
    #[must_use]
    pub const fn page() -> Self {
        Self {
            message: "The page you are looking for does not exist.",
        }
    }

    #[must_use]
    pub const fn product() -> Self {
        Self {
            message: "We could not find that product.",
        }
    }
}

/// Create the public product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the public page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route(
            "/contact",
            get(contact::page).merge(post(contact::submit).layer(form_rate_limiter())),
        )
        .route("/sitemap", get(sitemap::sitemap))
}

/// Build the full application router with every middleware except Sentry.
///
/// `main` adds the Sentry layers on top; tests drive this router directly.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let max_upload_bytes = config.max_upload_bytes;
    let session_layer = create_session_layer(state.pool(), config);
    let uploads = ServeDir::new(state.uploads().dir());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest("/api", api::routes(max_upload_bytes))
        .nest("/admin", admin::routes(max_upload_bytes))
        .nest_service("/uploads", uploads)
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Fallback for unknown paths.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate::page())
}
