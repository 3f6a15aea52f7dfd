//! JSON REST API.
//!
//! Every handler answers with `{"success": true, ...}` or, through
//! [`AppError`](crate::error::AppError), `{"error": "..."}`. Writes require an
//! admin session; unauthenticated calls get 401.

pub mod auth;
pub mod contact;
pub mod media;
pub mod products;
pub mod seed;
pub mod upload;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::AppError;
use crate::middleware::{auth_rate_limiter, form_rate_limiter};
use crate::state::AppState;

/// JSON request body. Malformed or mistyped bodies are rejected with the
/// `{"error": ...}` envelope instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `{success}`
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the product API router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/slug/{slug}", get(products::get_by_slug))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the media API router.
pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list).post(media::register))
        .route("/{id}", axum::routing::delete(media::delete))
}

/// Create the auth API router. Login is rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login).layer(auth_rate_limiter()))
        .route("/logout", post(auth::logout))
}

/// Create the upload route with its own body limit.
fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}

/// Create all API routes.
///
/// `max_upload_bytes` caps the request body of the upload endpoint.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/media", media_routes())
        .nest("/auth", auth_routes())
        .route(
            "/contact",
            get(contact::list).merge(post(contact::submit).layer(form_rate_limiter())),
        )
        .merge(upload_routes(max_upload_bytes))
        .route("/seed", post(seed::seed).layer(auth_rate_limiter()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Greeting {
        name: String,
    }

    async fn greet(ApiJson(greeting): ApiJson<Greeting>) -> String {
        greeting.name
    }

    async fn post_json(content_type: &str, body: &'static str) -> axum::response::Response {
        Router::new()
            .route("/greet", post(greet))
            .oneshot(
                Request::post("/greet")
                    .header(CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn error_of(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let resp = post_json("application/json", r#"{"name":"Ada"}"#).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let resp = post_json("application/json", "{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()[CONTENT_TYPE].to_str().unwrap(),
            "application/json"
        );
        let body = error_of(resp).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_field_type_uses_error_envelope() {
        let resp = post_json("application/json", r#"{"name":42}"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_of(resp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_uses_error_envelope() {
        let resp = post_json("text/plain", r#"{"name":"Ada"}"#).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_of(resp).await["error"].is_string());
    }
}
