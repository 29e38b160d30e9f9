//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /books                  - Book listing (?page, ?category)
//! GET  /books/{id}             - Book detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page with checkout totals
//! POST /cart/add               - Add to cart (returns count fragment)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout               - Place order, redirect to order history
//!
//! # Orders
//! GET  /orders                 - Order history (requires auth)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Content
//! GET  /pages/{slug}           - Markdown content pages (about, contact)
//! ```

pub mod auth;
pub mod books;
pub mod cart;
pub mod home;
pub mod orders;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(books::index))
        .route("/{id}", get(books::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog routes
        .nest("/books", book_routes())
        // Cart routes (burst-limited: HTMX fragments can be chatty)
        .nest("/cart", cart_routes().layer(api_rate_limiter()))
        // Checkout
        .route("/checkout", post(cart::checkout))
        // Order history
        .route("/orders", get(orders::index))
        // Auth routes (strictly limited against credential stuffing)
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        // Markdown content pages
        .route("/pages/{slug}", get(pages::show))
}
