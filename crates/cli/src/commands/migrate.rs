//! Database migration commands.
//!
//! The only local tables are the tower-sessions stores, one per binary,
//! so migration means asking the session store to create its schema.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string for storefront
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string for admin
//!
//! Either falls back to `DATABASE_URL` when the specific key is unset.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or the
/// migration fails.
pub async fn storefront() -> Result<(), MigrationError> {
    migrate_sessions("STOREFRONT_DATABASE_URL", "storefront").await
}

/// Run admin database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or the
/// migration fails.
pub async fn admin() -> Result<(), MigrationError> {
    migrate_sessions("ADMIN_DATABASE_URL", "admin").await
}

async fn migrate_sessions(env_key: &'static str, label: &str) -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var(env_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar(env_key))?;

    tracing::info!("Connecting to {label} database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running {label} session-store migration...");
    let store = PostgresStore::new(pool);
    store.migrate().await?;

    tracing::info!("{label} migrations complete!");
    Ok(())
}
