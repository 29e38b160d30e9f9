//! Live integration tests for the admin dashboard's role gate.
//!
//! These tests require:
//! - A running `PostgreSQL` database (migrated via `octavo-cli migrate all`)
//! - The admin server running (cargo run -p octavo-admin)
//! - The bookstore API reachable, with seeded USER and ADMIN accounts
//!
//! Run with: cargo test -p octavo-integration-tests -- --ignored

use reqwest::StatusCode;

use octavo_integration_tests::{admin_base_url, client};

#[tokio::test]
#[ignore = "Requires running admin server and backend"]
async fn test_guest_dashboard_redirects_to_login() {
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .get(&base_url)
        .send()
        .await
        .expect("Failed to reach admin");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect carries a location");
    assert!(location.starts_with("/auth/login"));
}

#[tokio::test]
#[ignore = "Requires running admin server, backend, and a seeded non-admin user"]
async fn test_regular_user_is_sent_to_storefront() {
    let client = client();
    let base_url = admin_base_url();

    let email = std::env::var("TEST_USER_EMAIL").unwrap_or_else(|_| "user@example.com".into());
    let password = std::env::var("TEST_USER_PASSWORD").unwrap_or_else(|_| "password123".into());

    // A valid non-admin login must not produce a dashboard session.
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to reach admin");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect carries a location");
    assert!(
        !location.starts_with("/auth/login"),
        "non-admin login should bounce to the storefront, not back to login"
    );

    // And the dashboard must still be gated afterwards.
    let resp = client
        .get(&base_url)
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "Requires running admin server, backend, and a seeded admin"]
async fn test_admin_sees_dashboard() {
    let client = client();
    let base_url = admin_base_url();

    let email = std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "password123".into());

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(&base_url)
        .send()
        .await
        .expect("Failed to reach admin");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Dashboard"));
}
