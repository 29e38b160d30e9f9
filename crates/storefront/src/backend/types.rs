//! Wire types for the bookstore REST API.
//!
//! Field names follow the backend's camelCase JSON. Price fields arrive as
//! JSON numbers *or* numeric strings depending on the endpoint, so every
//! amount deserializes through the lenient coercion helpers in
//! `octavo-core` - the rest of the crate only ever sees `Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use octavo_core::pricing::lenient;
use octavo_core::{BookId, CartItemId, CartLine, OrderId, OrderItemId, OrderStatus, UserId};

// =============================================================================
// Page Envelope
// =============================================================================

/// Spring-style page envelope returned by every paginated endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Total pages available.
    pub total_pages: u32,
    /// Total items across all pages.
    pub total_elements: i64,
    /// Current page number (0-based).
    pub number: u32,
    /// Page size requested.
    pub size: u32,
    /// Whether this is the first page.
    #[serde(default)]
    pub first: bool,
    /// Whether this is the last page.
    #[serde(default)]
    pub last: bool,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A book listing.
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
    /// Current selling price.
    #[serde(deserialize_with = "lenient::decimal_or_zero")]
    pub price: Decimal,
    /// Pre-markdown price, when the book is on sale.
    #[serde(default, deserialize_with = "lenient::optional_decimal")]
    pub original_price: Option<Decimal>,
}

impl Book {
    /// Percentage off, present only for a real markdown.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<u32> {
        octavo_core::discount_percentage(self.price, self.original_price)
    }

    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line in the logged-in user's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub book_id: BookId,
    pub title: String,
    pub quantity: i64,
    #[serde(deserialize_with = "lenient::decimal_or_zero")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&CartItem> for CartLine {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            book_id: item.book_id,
            title: item.title.clone(),
            quantity: u32::try_from(item.quantity).unwrap_or(1),
            unit_price: item.price,
        }
    }
}

/// The cart payload returned by `GET /api/cart`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartPayload {
    /// Convert wire items into calculator lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.items.iter().map(CartLine::from).collect()
    }
}

/// Body for `POST /api/cart/add`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddRequest {
    pub book_id: BookId,
    pub quantity: u32,
}

// =============================================================================
// Order Types
// =============================================================================

/// One line of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub quantity: i64,
    #[serde(deserialize_with = "lenient::decimal_or_zero")]
    pub price: Decimal,
    pub book: Book,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Backend timestamp; format varies, parsed leniently at display time.
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

/// Body for `POST /api/orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub shipping_address: String,
    pub payment_method: String,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Response from `POST /api/auth/login` and `POST /api/auth/register`.
///
/// The user object is kept as raw JSON: the backend reports roles in
/// several shapes, and normalization happens once at the session boundary
/// via `octavo_core::AuthUser::from_payload`.
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

/// Body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_book_price_coercion() {
        // Prices as strings, the backend's usual shape
        let book: Book = serde_json::from_value(json!({
            "id": 1,
            "title": "The Long Way",
            "author": "B. Chambers",
            "price": "14.99",
            "originalPrice": "19.99",
            "stock": 3,
        }))
        .unwrap();
        assert_eq!(book.price, "14.99".parse::<Decimal>().unwrap());
        assert_eq!(book.discount_percentage(), Some(25));
        assert!(book.in_stock());
    }

    #[test]
    fn test_book_unparsable_original_price_is_absent() {
        let book: Book = serde_json::from_value(json!({
            "id": 2,
            "title": "x",
            "author": "y",
            "price": 10,
            "originalPrice": "n/a",
        }))
        .unwrap();
        assert_eq!(book.original_price, None);
        assert_eq!(book.discount_percentage(), None);
    }

    #[test]
    fn test_cart_payload_to_lines() {
        let payload: CartPayload = serde_json::from_value(json!({
            "items": [
                {"id": 1, "bookId": 10, "title": "A", "quantity": 2, "price": "10"},
                {"id": 2, "bookId": 11, "title": "B", "quantity": 1, "price": 5},
            ]
        }))
        .unwrap();
        let lines = payload.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 2);

        let totals = octavo_core::OrderTotals::compute(&lines);
        assert_eq!(totals.total, "32.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_order_deserializes_status_and_amount() {
        let order: Order = serde_json::from_value(json!({
            "id": 5,
            "orderDate": "2026-07-01T10:15:00",
            "status": "SHIPPED",
            "totalAmount": "42.50",
            "userId": 3,
            "orderItems": [],
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total_amount, "42.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_page_envelope() {
        let page: PageResponse<Book> = serde_json::from_value(json!({
            "content": [],
            "totalPages": 4,
            "totalElements": 48,
            "number": 1,
            "size": 12,
            "first": false,
            "last": false,
        }))
        .unwrap();
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.number, 1);
    }
}
