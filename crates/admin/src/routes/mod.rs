//! HTTP route handlers for the admin dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard (order/user/book tallies)
//! GET  /health                  - Health check
//!
//! # Orders
//! GET  /orders                  - All orders
//! POST /orders/{id}/status      - Move an order to a new status
//!
//! # Catalog
//! GET  /books                   - Management table (?page)
//! GET  /books/new               - Create form
//! POST /books                   - Create
//! GET  /books/{id}/edit         - Edit form
//! POST /books/{id}             - Update
//! POST /books/{id}/delete       - Delete
//!
//! # Users
//! GET  /users                   - User table
//! POST /users/{id}/role         - Change a user's role
//! POST /users/{id}/delete       - Delete a user
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! POST /auth/logout             - Logout action
//! ```
//!
//! Every route except `/auth/*` and `/health` is guarded by
//! [`crate::middleware::RequireAdmin`].

pub mod auth;
pub mod books;
pub mod dashboard;
pub mod orders;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the order management router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/status", post(orders::update_status))
}

/// Create the catalog management router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index).post(books::create))
        .route("/new", get(books::new))
        .route("/{id}", post(books::update))
        .route("/{id}/edit", get(books::edit))
        .route("/{id}/delete", post(books::delete))
}

/// Create the user management router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}/role", post(users::update_role))
        .route("/{id}/delete", post(users::delete))
}

/// Create all routes for the admin dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/orders", order_routes())
        .nest("/books", book_routes())
        .nest("/users", user_routes())
        .nest("/auth", auth_routes())
}
