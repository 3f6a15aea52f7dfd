//! Integration tests for the product REST API.
//!
//! These tests require:
//! - A `PostgreSQL` database at `RMT_TEST_DATABASE_URL`
//!
//! Run with: cargo test -p rmt-integration-tests -- --ignored

use reqwest::StatusCode;
use rmt_integration_tests::{TestContext, anonymous_client, product_body};
use serde_json::{Value, json};

// ============================================================================
// Create & Read
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_create_then_lookup_by_slug() {
    let ctx = TestContext::logged_in().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&json!({
            "name": "X",
            "slug": "x",
            "category": "C",
            "shortDescription": "s",
            "description": "d",
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["success"], true);
    let id = created["productId"].as_str().expect("productId missing");
    assert_eq!(created["product"]["id"], id);

    let resp = anonymous_client()
        .get(ctx.url("/api/products/slug/x"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Value = resp.json().await.unwrap();
    assert_eq!(found["success"], true);
    assert_eq!(found["product"], created["product"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_create_then_read_by_id_keeps_fields() {
    let ctx = TestContext::logged_in().await;

    let body = json!({
        "name": "Jaw Crusher JC-900",
        "slug": "jaw-crusher-jc-900",
        "category": "Crushers",
        "shortDescription": "Primary crushing",
        "description": "Heavy duty jaw crusher",
        "imageUrl": "/uploads/jc900.jpg",
        "galleryUrls": ["/uploads/jc900-side.jpg"],
        "keyFeatures": ["Hydraulic setting", "Manganese jaws"],
        "specifications": [{ "label": "Feed opening", "value": "900 x 600 mm" }],
        "isFeatured": true,
        "order": 3,
    });
    let created = ctx.create_product(&body).await;
    let id = created["id"].as_str().unwrap();

    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let product: Value = resp.json().await.unwrap();
    let product = &product["product"];

    for field in [
        "name",
        "slug",
        "category",
        "shortDescription",
        "description",
        "imageUrl",
        "galleryUrls",
        "keyFeatures",
        "specifications",
        "isFeatured",
        "order",
    ] {
        assert_eq!(product[field], body[field], "field {field} changed");
    }
    assert_eq!(product["applicationName"], ctx.scope.as_str());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_list_is_sorted_by_order() {
    let ctx = TestContext::logged_in().await;

    let mut late = product_body("Cone Crusher", "cone-crusher", "Crushers");
    late["order"] = json!(5);
    let mut early = product_body("Vibrating Screen", "vibrating-screen", "Screens");
    early["order"] = json!(1);
    ctx.create_product(&late).await;
    ctx.create_product(&early).await;

    let resp = anonymous_client()
        .get(ctx.url("/api/products"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let slugs: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["vibrating-screen", "cone-crusher"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_create_rejects_missing_fields_and_duplicate_slug() {
    let ctx = TestContext::logged_in().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&json!({ "slug": "no-name", "category": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Name is required");

    ctx.create_product(&product_body("Feeder", "feeder", "Feeders"))
        .await;
    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&product_body("Feeder Two", "feeder", "Feeders"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// ============================================================================
// Update & Delete
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_update_replaces_only_submitted_fields() {
    let ctx = TestContext::logged_in().await;
    let created = ctx
        .create_product(&product_body("Impact Crusher", "impact-crusher", "Crushers"))
        .await;
    let id = created["id"].as_str().unwrap();

    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .json(&json!({ "shortDescription": "Secondary crushing", "order": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let updated = &body["product"];

    assert_eq!(updated["shortDescription"], "Secondary crushing");
    assert_eq!(updated["order"], 7);
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["slug"], created["slug"]);
    assert_eq!(updated["description"], created["description"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_delete_then_read_is_not_found() {
    let ctx = TestContext::logged_in().await;
    let created = ctx
        .create_product(&product_body("Sand Washer", "sand-washer", "Washers"))
        .await;
    let id = created["id"].as_str().unwrap();

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Product not found");

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_malformed_id_is_not_found() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/api/products/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Scope Isolation
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_products_are_scoped_per_site() {
    let first = TestContext::logged_in().await;
    let second = TestContext::new().await;

    first
        .create_product(&product_body("Ball Mill", "ball-mill", "Mills"))
        .await;

    let resp = second
        .client
        .get(second.url("/api/products/slug/ball-mill"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
