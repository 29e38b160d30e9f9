//! Admin-side bookstore API client implementation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

use octavo_core::{BookId, OrderId, OrderStatus, UserId};

use super::BackendError;
use super::types::{
    AuthResponse, Book, BookPayload, LoginRequest, Order, PageResponse, UpdateStatusRequest,
    UserAccount, UserUpdateRequest,
};

/// Client for the bookstore API's administrative surface.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
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
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Forbidden);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

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
    /// Returns `BackendError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.inner.http.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    /// Invalidate the token server-side. Best effort.
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
    // Order Management
    // =========================================================================

    /// Get every order in the store.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Forbidden` when the token lacks admin rights.
    #[instrument(skip(self, token))]
    pub async fn all_orders(&self, token: &str) -> Result<Vec<Order>, BackendError> {
        self.execute(
            self.inner
                .http
                .get(self.url("/api/orders"))
                .bearer_auth(token),
        )
        .await
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &str,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        let path = format!("/api/orders/{order_id}/status");
        let body = UpdateStatusRequest { status };
        self.execute(
            self.inner
                .http
                .put(self.url(&path))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    // =========================================================================
    // Catalog Management
    // =========================================================================

    /// Get a page of the catalog.
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
        self.execute(
            self.inner
                .http
                .get(self.url("/api/books"))
                .query(&[("page", page), ("size", size)]),
        )
        .await
    }

    /// Get a single book by ID.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the book does not exist.
    #[instrument(skip(self), fields(book_id = %book_id))]
    pub async fn get_book(&self, book_id: BookId) -> Result<Book, BackendError> {
        let path = format!("/api/books/{book_id}");
        self.execute(self.inner.http.get(self.url(&path))).await
    }

    /// Add a book to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails.
    #[instrument(skip(self, token, payload), fields(title = %payload.title))]
    pub async fn create_book(
        &self,
        token: &str,
        payload: &BookPayload,
    ) -> Result<Book, BackendError> {
        self.execute(
            self.inner
                .http
                .post(self.url("/api/books"))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    /// Update a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[instrument(skip(self, token, payload), fields(book_id = %book_id))]
    pub async fn update_book(
        &self,
        token: &str,
        book_id: BookId,
        payload: &BookPayload,
    ) -> Result<Book, BackendError> {
        let path = format!("/api/books/{book_id}");
        self.execute(
            self.inner
                .http
                .put(self.url(&path))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    /// Remove a book from the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    #[instrument(skip(self, token), fields(book_id = %book_id))]
    pub async fn delete_book(&self, token: &str, book_id: BookId) -> Result<(), BackendError> {
        let path = format!("/api/books/{book_id}");
        self.execute_empty(self.inner.http.delete(self.url(&path)).bearer_auth(token))
            .await
    }

    // =========================================================================
    // User Management
    // =========================================================================

    /// Get every user account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Forbidden` when the token lacks admin rights.
    #[instrument(skip(self, token))]
    pub async fn list_users(&self, token: &str) -> Result<Vec<UserAccount>, BackendError> {
        self.execute(
            self.inner
                .http
                .get(self.url("/api/admin/users"))
                .bearer_auth(token),
        )
        .await
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[instrument(skip(self, token), fields(user_id = %user_id, role = %role))]
    pub async fn update_user_role(
        &self,
        token: &str,
        user_id: UserId,
        role: &str,
    ) -> Result<UserAccount, BackendError> {
        let path = format!("/api/admin/users/{user_id}");
        let body = UserUpdateRequest {
            role: role.to_string(),
        };
        self.execute(
            self.inner
                .http
                .put(self.url(&path))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn delete_user(&self, token: &str, user_id: UserId) -> Result<(), BackendError> {
        let path = format!("/api/admin/users/{user_id}");
        self.execute_empty(self.inner.http.delete(self.url(&path)).bearer_auth(token))
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
mod tests {
    use super::*;

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let client = BackendClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/orders"), "http://localhost:8080/api/orders");
    }
}
