//! Integration tests for contact submissions.
//!
//! These tests require:
//! - A `PostgreSQL` database at `RMT_TEST_DATABASE_URL`
//!
//! Run with: cargo test -p rmt-integration-tests -- --ignored

use reqwest::StatusCode;
use rmt_integration_tests::{TestContext, anonymous_client};
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_api_submission_is_listed_for_admin() {
    let ctx = TestContext::logged_in().await;

    let resp = anonymous_client()
        .post(ctx.url("/api/contact"))
        .json(&json!({
            "name": "Ada Quarry",
            "email": "ada@quarry.co",
            "company": "Granite Works",
            "message": "Need a quote for a 200 tph plant",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    let contact_id = body["contactId"].as_str().unwrap().to_string();

    let resp = ctx
        .client
        .get(ctx.url("/api/contact"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let contacts = body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["id"], contact_id.as_str());
    assert_eq!(contacts[0]["status"], "new");
    assert_eq!(contacts[0]["phone"], Value::Null);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_api_submission_validation() {
    let ctx = TestContext::new().await;

    let cases = [
        (json!({ "email": "ada@quarry.co", "message": "Hi" }), "Name is required"),
        (
            json!({ "name": "Ada", "email": "ada@", "message": "Hi" }),
            "Invalid email address",
        ),
        (
            json!({ "name": "Ada", "email": "ada@quarry.co", "message": "  " }),
            "Message is required",
        ),
    ];

    for (payload, expected) in cases {
        let resp = ctx
            .client
            .post(ctx.url("/api/contact"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body: Value = resp.json().await.unwrap();
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with(expected), "{error}");
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_malformed_json_gets_error_envelope() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at RMT_TEST_DATABASE_URL"]
async fn test_contact_page_form() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/contact"))
        .form(&[
            ("name", "Ada"),
            ("email", "ada@quarry.co"),
            ("message", "Spare parts for a cone crusher"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Subject is required"));
    assert!(page.contains("Spare parts for a cone crusher"));

    let resp = ctx
        .client
        .post(ctx.url("/contact"))
        .form(&[
            ("name", "Ada"),
            ("email", "ada@quarry.co"),
            ("subject", "Spare parts"),
            ("message", "Spare parts for a cone crusher"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Your message has been sent"));
}
