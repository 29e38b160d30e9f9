//! Live integration tests for storefront route guarding.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated via `octavo-cli migrate all`)
//! - The storefront server running (cargo run -p octavo-storefront)
//! - The bookstore API reachable at `BOOKSTORE_API_URL`
//!
//! Run with: cargo test -p octavo-integration-tests -- --ignored

use reqwest::StatusCode;

use octavo_integration_tests::{client, storefront_base_url};

#[tokio::test]
#[ignore = "Requires running storefront server and backend"]
async fn test_guest_orders_redirects_to_login_with_next() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect carries a location");
    assert!(location.starts_with("/auth/login"));
    assert!(location.contains("next=%2Forders"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and backend"]
async fn test_guest_cart_redirects_to_login() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "Requires running storefront server and backend"]
async fn test_catalog_is_public() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/books"))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("book-grid"));
}

#[tokio::test]
#[ignore = "Requires running storefront server, backend, and a seeded user"]
async fn test_login_returns_to_attempted_path() {
    let client = client();
    let base_url = storefront_base_url();

    let email = std::env::var("TEST_USER_EMAIL").unwrap_or_else(|_| "user@example.com".into());
    let password = std::env::var("TEST_USER_PASSWORD").unwrap_or_else(|_| "password123".into());

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("next", "/orders"),
        ])
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect carries a location");
    assert_eq!(location, "/orders");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health_endpoint() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach storefront");

    assert_eq!(resp.status(), StatusCode::OK);
}
