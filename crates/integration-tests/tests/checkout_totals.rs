//! Offline integration tests: backend payloads through the storefront's
//! wire types into checkout totals and rendered amounts.
//!
//! These run without any server; they pin the full path a cart response
//! takes from JSON to the numbers a customer sees.

use rust_decimal::Decimal;
use serde_json::json;

use octavo_core::{OrderTotals, format_currency};
use octavo_storefront::backend::types::{Book, CartPayload, PageResponse};
use octavo_storefront::routes::cart::CartView;

fn dec(s: &str) -> Decimal {
    s.parse().expect("valid decimal literal")
}

#[test]
fn cart_payload_with_string_prices_reaches_expected_totals() {
    // Prices as numeric strings, the backend's usual serialization.
    let payload: CartPayload = serde_json::from_value(json!({
        "items": [
            {"id": 1, "bookId": 10, "title": "Dune", "quantity": 2, "price": "10"},
            {"id": 2, "bookId": 11, "title": "Persuasion", "quantity": 1, "price": "5"},
        ]
    }))
    .expect("cart payload deserializes");

    let totals = OrderTotals::compute(&payload.lines());
    assert_eq!(totals.subtotal, dec("25"));
    assert_eq!(totals.shipping, dec("5.99"));
    assert_eq!(totals.tax, dec("2.00"));
    assert_eq!(totals.total, dec("32.99"));
}

#[test]
fn empty_cart_renders_all_zero() {
    let payload: CartPayload = serde_json::from_value(json!({"items": []})).expect("deserializes");
    let view = CartView::from(&payload);

    assert_eq!(view.item_count, 0);
    assert_eq!(view.totals.subtotal, "$0.00");
    assert_eq!(view.totals.shipping, "$0.00");
    assert_eq!(view.totals.tax, "$0.00");
    assert_eq!(view.totals.total, "$0.00");
}

#[test]
fn cart_view_formats_line_and_grand_totals() {
    let payload: CartPayload = serde_json::from_value(json!({
        "items": [
            {"id": 1, "bookId": 10, "title": "Dune", "quantity": 3, "price": 12.5,
             "image": "covers/dune.jpg"},
        ]
    }))
    .expect("deserializes");

    let view = CartView::from(&payload);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].price, "$12.50");
    assert_eq!(view.items[0].line_price, "$37.50");
    assert_eq!(view.items[0].image.as_deref(), Some("covers/dune.jpg"));
    // 37.50 + 5.99 + 3.00
    assert_eq!(view.totals.total, "$46.49");
}

#[test]
fn book_listing_discount_badges_from_mixed_price_shapes() {
    let page: PageResponse<Book> = serde_json::from_value(json!({
        "content": [
            {"id": 1, "title": "On sale", "author": "A", "price": "14.99",
             "originalPrice": 19.99, "stock": 5},
            {"id": 2, "title": "Full price", "author": "B", "price": 9.99, "stock": 5},
            {"id": 3, "title": "Bad original", "author": "C", "price": "9.99",
             "originalPrice": "uh oh", "stock": 5},
        ],
        "totalPages": 1,
        "totalElements": 3,
        "number": 0,
        "size": 12,
    }))
    .expect("page deserializes");

    let discounts: Vec<Option<u32>> = page
        .content
        .iter()
        .map(Book::discount_percentage)
        .collect();
    assert_eq!(discounts, vec![Some(25), None, None]);
}

#[test]
fn currency_formatting_round_trips_wire_strings() {
    assert_eq!(format_currency(Some(dec("12.5"))), "$12.50");
    assert_eq!(format_currency(None), "-");
}
