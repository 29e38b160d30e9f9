//! Database access for the storefront `PostgreSQL`.
//!
//! The bookstore API is the source of truth for every domain entity; the
//! local database exists only to back the tower-sessions store.
//!
//! # Tables
//!
//! - `session` - Tower-sessions storage (created by
//!   `cargo run -p octavo-cli -- migrate storefront`)

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
