//! Wire types for the bookstore API's administrative surface.
//!
//! Same camelCase conventions and lenient price coercion as the public
//! surface, plus the user-management and catalog-editing payloads only
//! admins may send.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use octavo_core::pricing::lenient;
use octavo_core::{BookId, OrderId, OrderStatus, UserId};

// =============================================================================
// Page Envelope
// =============================================================================

/// Spring-style page envelope returned by paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: i64,
    pub number: u32,
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A book as the catalog stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient::decimal_or_zero")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub original_price: Option<Decimal>,
}

/// Create/update payload for a book.
///
/// Prices are sent as strings: that is the shape the backend round-trips
/// without losing decimal places.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    pub genre: String,
    pub stock: i64,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
}

// =============================================================================
// Order Types
// =============================================================================

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub quantity: i64,
    #[serde(deserialize_with = "lenient::decimal_or_zero")]
    pub price: Decimal,
    pub book: Book,
}

/// An order, any customer's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_date: String,
    pub status: OrderStatus,
    #[serde(deserialize_with = "lenient::decimal_or_zero")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// Body for `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// =============================================================================
// User Management Types
// =============================================================================

/// A user account as the backend reports it.
///
/// The raw `role` string is displayed as-is in the management table; any
/// access decision goes through `octavo_core::infer_role` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body for `PUT /api/admin/users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdateRequest {
    pub role: String,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Response from `POST /api/auth/login`.
///
/// The user object stays raw JSON; role normalization happens at the
/// session boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Value,
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_account_tolerates_missing_role() {
        let user: UserAccount =
            serde_json::from_value(json!({"id": 1, "username": "a", "email": "a@x.com"})).unwrap();
        assert_eq!(user.role, None);
    }

    #[test]
    fn test_update_status_wire_shape() {
        let body = UpdateStatusRequest {
            status: OrderStatus::Shipped,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"status": "SHIPPED"})
        );
    }

    #[test]
    fn test_book_payload_omits_absent_original_price() {
        let payload = BookPayload {
            title: "T".into(),
            author: "A".into(),
            isbn: String::new(),
            description: String::new(),
            genre: "Fiction".into(),
            stock: 4,
            price: "9.99".into(),
            original_price: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("originalPrice").is_none());
        assert_eq!(value["price"], json!("9.99"));
    }
}
