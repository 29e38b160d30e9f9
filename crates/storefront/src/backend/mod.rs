//! Bookstore REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local sync, direct API calls
//! - Per-user bearer tokens attached per request
//! - In-memory caching via `moka` for catalog reads (5 minute TTL);
//!   cart and order calls are never cached
//!
//! # Error Shape
//!
//! Every failure is normalized into [`BackendError`]: transport problems,
//! auth rejections, rate limiting, and the backend's own
//! `{"message": ...}` error envelope all arrive as one enum so route
//! handlers can map them uniformly.
//!
//! # Example
//!
//! ```rust,ignore
//! use octavo_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.bookstore);
//!
//! // Get a page of books
//! let page = client.list_books(0, 12).await?;
//!
//! // Add to the logged-in user's cart
//! client.add_to_cart(token, book.id, 1).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the bookstore API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (network, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with an error payload.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bearer token missing, expired, or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl BackendError {
    /// Whether this error means the session's token is no longer valid.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("book 123".to_string());
        assert_eq!(err.to_string(), "Not found: book 123");

        let err = BackendError::Api {
            status: 409,
            message: "email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "API error (409): email already registered");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = BackendError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(BackendError::Unauthorized.is_auth_failure());
        assert!(!BackendError::NotFound("x".into()).is_auth_failure());
    }
}
