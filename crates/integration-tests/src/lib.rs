//! Integration tests for Octavo Books.
//!
//! # Test Categories
//!
//! - Offline: wire payloads driven through deserialization into totals
//!   and view models (always run)
//! - Live: guard and checkout flows against running servers (ignored by
//!   default; see below)
//!
//! # Running the live tests
//!
//! ```bash
//! # Start the database and both binaries, then:
//! STOREFRONT_BASE_URL=http://localhost:3000 \
//! ADMIN_BASE_URL=http://localhost:3001 \
//! cargo test -p octavo-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin dashboard (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client with a cookie store, without following redirects.
///
/// Redirects stay visible so guard behavior (where a redirect *is* the
/// assertion) can be tested directly.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
