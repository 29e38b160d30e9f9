//! Bookstore REST API client implementation.
//!
//! Uses `reqwest` for HTTP. Catalog reads (books, categories) are cached
//! using `moka` (5-minute TTL); cart and order calls always go to the
//! backend.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::BookstoreApiConfig;

use super::BackendError;
use super::types::{
    AuthResponse, Book, CartAddRequest, CartItem, CartPayload, LoginRequest, Order,
    PageResponse, PlaceOrderRequest, RegisterRequest,
};

use octavo_core::{BookId, CartItemId};

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Book(Box<Book>),
    Books(PageResponse<Book>),
    Categories(Vec<String>),
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the bookstore REST API.
///
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new bookstore API client.
    #[must_use]
    pub fn new(config: &BookstoreApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and parse the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let text = self.execute_raw(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse bookstore API response"
            );
            BackendError::Parse(e)
        })
    }

    /// Execute a request where the response body does not matter.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), BackendError> {
        self.execute_raw(request).await.map(|_| ())
    }

    /// Send a request and normalize every failure into [`BackendError`].
    async fn execute_raw(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        // Read the body before status handling for better error diagnostics
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(
                extract_message(&text).unwrap_or_else(|| "resource not found".to_string()),
            ));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Bookstore API returned non-success status"
            );
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: extract_message(&text)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            });
        }

        Ok(text)
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` for bad credentials, or another
    /// variant if the request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.inner.http.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails (e.g., email already taken).
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(
            self.inner
                .http
                .post(self.url("/api/auth/register"))
                .json(&body),
        )
        .await
    }

    /// Invalidate the token server-side. Best effort; callers may ignore
    /// the result since the session is cleared locally regardless.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), BackendError> {
        self.execute_empty(
            self.inner
                .http
                .post(self.url("/api/auth/logout"))
                .bearer_auth(token),
        )
        .await
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get a page of the book catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_books(
        &self,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Book>, BackendError> {
        let cache_key = format!("books:{page}:{size}");

        if let Some(CacheValue::Books(books)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for book listing");
            return Ok(books);
        }

        let page_response: PageResponse<Book> = self
            .execute(
                self.inner
                    .http
                    .get(self.url("/api/books"))
                    .query(&[("page", page), ("size", size)]),
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Books(page_response.clone()))
            .await;

        Ok(page_response)
    }

    /// Get a page of books in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn books_by_category(
        &self,
        category: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Book>, BackendError> {
        let cache_key = format!("books:cat:{category}:{page}:{size}");

        if let Some(CacheValue::Books(books)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category listing");
            return Ok(books);
        }

        let path = format!("/api/books/category/{}", urlencoding::encode(category));
        let page_response: PageResponse<Book> = self
            .execute(
                self.inner
                    .http
                    .get(self.url(&path))
                    .query(&[("page", page), ("size", size)]),
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Books(page_response.clone()))
            .await;

        Ok(page_response)
    }

    /// Get a single book by ID.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the book does not exist.
    #[instrument(skip(self), fields(book_id = %book_id))]
    pub async fn get_book(&self, book_id: BookId) -> Result<Book, BackendError> {
        let cache_key = format!("book:{book_id}");

        if let Some(CacheValue::Book(book)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for book");
            return Ok(*book);
        }

        let path = format!("/api/books/{book_id}");
        let book: Book = self.execute(self.inner.http.get(self.url(&path))).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Book(Box::new(book.clone())))
            .await;

        Ok(book)
    }

    /// Get the list of catalog categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, BackendError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<String> = self
            .execute(self.inner.http.get(self.url("/api/books/categories")))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Cart Methods (not cached - per-user mutable state)
    // =========================================================================

    /// Get the logged-in user's cart.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` when the token is invalid.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> Result<CartPayload, BackendError> {
        self.execute(
            self.inner
                .http
                .get(self.url("/api/cart"))
                .bearer_auth(token),
        )
        .await
    }

    /// Add a book to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails.
    #[instrument(skip(self, token), fields(book_id = %book_id))]
    pub async fn add_to_cart(
        &self,
        token: &str,
        book_id: BookId,
        quantity: u32,
    ) -> Result<CartItem, BackendError> {
        let body = CartAddRequest { book_id, quantity };
        self.execute(
            self.inner
                .http
                .post(self.url("/api/cart/add"))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    /// Set the quantity of a cart item.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        token: &str,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        let path = format!("/api/cart/update/{item_id}");
        self.execute_empty(
            self.inner
                .http
                .put(self.url(&path))
                .bearer_auth(token)
                .query(&[("quantity", quantity)]),
        )
        .await
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn remove_cart_item(
        &self,
        token: &str,
        item_id: CartItemId,
    ) -> Result<(), BackendError> {
        let path = format!("/api/cart/remove/{item_id}");
        self.execute_empty(self.inner.http.delete(self.url(&path)).bearer_auth(token))
            .await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order from the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be placed.
    #[instrument(skip(self, token, shipping_address))]
    pub async fn place_order(
        &self,
        token: &str,
        shipping_address: &str,
        payment_method: &str,
    ) -> Result<Order, BackendError> {
        let body = PlaceOrderRequest {
            shipping_address: shipping_address.to_string(),
            payment_method: payment_method.to_string(),
        };
        self.execute(
            self.inner
                .http
                .post(self.url("/api/orders"))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    /// Get the logged-in user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, BackendError> {
        self.execute(
            self.inner
                .http
                .get(self.url("/api/orders/me"))
                .bearer_auth(token),
        )
        .await
    }

}

/// Pull the `message` field out of a backend error body, if there is one.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"status":409,"message":"email already registered"}"#),
            Some("email already registered".to_string())
        );
        assert_eq!(extract_message("not json"), None);
        assert_eq!(extract_message(r#"{"error":"no message field"}"#), None);
    }

    #[test]
    fn test_url_join() {
        let client = BackendClient::new(&BookstoreApiConfig {
            base_url: "http://localhost:8080".to_string(),
        });
        assert_eq!(client.url("/api/books"), "http://localhost:8080/api/books");
    }
}
