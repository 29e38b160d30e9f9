//! Bookstore REST API client (administrative surface).
//!
//! Unlike the storefront's client this one is never cached: after a
//! status change or a catalog edit the dashboard must show what the
//! backend now holds, not what it held five minutes ago. All calls carry
//! the signed-in admin's bearer token.

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

    /// Admin endpoints refused the caller's role.
    #[error("Forbidden")]
    Forbidden,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        assert_eq!(BackendError::Forbidden.to_string(), "Forbidden");
        assert_eq!(
            BackendError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .to_string(),
            "API error (500): boom"
        );
    }
}
