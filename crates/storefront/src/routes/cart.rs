//! Cart and checkout route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the backend, keyed by the session's bearer
//! token; totals are recomputed from the line items on every render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use octavo_core::{BookId, CartItemId, CartLine, OrderTotals, format_currency};

use crate::backend::types::CartPayload;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::SessionAuth;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub book_id: i64,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Checkout totals display data for templates.
#[derive(Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub totals: TotalsView,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_lines(&[])
    }

    /// Build the view from calculator lines, computing checkout totals.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let totals = OrderTotals::compute(lines);

        Self {
            items: lines
                .iter()
                .map(|line| CartItemView {
                    id: line.id.as_i64(),
                    book_id: line.book_id.as_i64(),
                    title: line.title.clone(),
                    quantity: line.quantity,
                    price: format_currency(Some(line.unit_price)),
                    line_price: format_currency(Some(line.line_total())),
                    image: None,
                })
                .collect(),
            totals: TotalsView {
                subtotal: format_currency(Some(totals.subtotal)),
                shipping: format_currency(Some(totals.shipping)),
                tax: format_currency(Some(totals.tax)),
                total: format_currency(Some(totals.total)),
            },
            item_count: OrderTotals::item_count(lines),
        }
    }
}

impl From<&CartPayload> for CartView {
    fn from(payload: &CartPayload) -> Self {
        let mut view = Self::from_lines(&payload.lines());
        // Carry cover images through; the calculator lines don't hold them.
        for (item, wire) in view.items.iter_mut().zip(&payload.items) {
            item.image.clone_from(&wire.image);
        }
        view
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub book_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: i64,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub shipping_address: String,
    pub payment_method: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Checkout query parameters (error display).
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub error: Option<String>,
}

/// Whether the request came from HTMX.
///
/// HTMX swaps in the returned fragment; a plain form submission gets a
/// redirect back to the cart page instead.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true")
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page with checkout totals.
#[instrument(skip(state, session, viewer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(viewer): RequireAuth,
    axum::extract::Query(query): axum::extract::Query<CartQuery>,
) -> Response {
    let cart = match state.backend().get_cart(&viewer.token).await {
        Ok(payload) => CartView::from(&payload),
        Err(e) if e.is_auth_failure() => {
            // Token revoked server-side: drop the stale session entirely.
            SessionAuth::clear(&session).await;
            return Redirect::to("/auth/login?error=session_expired").into_response();
        }
        Err(e) => {
            tracing::warn!("Failed to fetch cart: {e}");
            CartView::empty()
        }
    };

    CartShowTemplate {
        cart,
        error: query.error,
    }
    .into_response()
}

/// Add a book to the cart (HTMX).
///
/// Returns an HTMX trigger to update the cart count badge.
#[instrument(skip(state, viewer, headers))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(viewer): RequireAuth,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1).max(1);

    let result = state
        .backend()
        .add_to_cart(&viewer.token, BookId::new(form.book_id), quantity)
        .await;

    match result {
        Ok(_) => {
            if !is_htmx(&headers) {
                return Redirect::to("/cart").into_response();
            }

            let count = state
                .backend()
                .get_cart(&viewer.token)
                .await
                .map(|payload| OrderTotals::item_count(&payload.lines()))
                .unwrap_or(0);

            // Return cart count with HTMX trigger to update other elements
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            if is_htmx(&headers) {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<span class=\"cart-error\">Error adding to cart</span>"),
                )
                    .into_response()
            } else {
                Redirect::to("/cart?error=add_failed").into_response()
            }
        }
    }
}

/// Update cart item quantity (HTMX).
///
/// Quantities below one are refused before calling the backend: the UI
/// offers remove for that, and the totals calculator assumes `>= 1`.
#[instrument(skip(state, viewer, headers))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(viewer): RequireAuth,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    if form.quantity >= 1 {
        if let Err(e) = state
            .backend()
            .update_cart_item(&viewer.token, CartItemId::new(form.item_id), form.quantity)
            .await
        {
            tracing::error!("Failed to update cart: {e}");
        }
    }
    // quantity 0 falls through untouched: decrementing below one is not a
    // removal, the trash control is

    if !is_htmx(&headers) {
        return Redirect::to("/cart").into_response();
    }

    let response = current_items_fragment(&state, &viewer.token).await;
    (AppendHeaders([("HX-Trigger", "cart-updated")]), response).into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, viewer, headers))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(viewer): RequireAuth,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    if let Err(e) = state
        .backend()
        .remove_cart_item(&viewer.token, CartItemId::new(form.item_id))
        .await
    {
        tracing::error!("Failed to remove from cart: {e}");
    }

    if !is_htmx(&headers) {
        return Redirect::to("/cart").into_response();
    }

    let response = current_items_fragment(&state, &viewer.token).await;
    (AppendHeaders([("HX-Trigger", "cart-updated")]), response).into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, viewer))]
pub async fn count(State(state): State<AppState>, OptionalAuth(viewer): OptionalAuth) -> Response {
    let count = match viewer {
        Some(viewer) => state
            .backend()
            .get_cart(&viewer.token)
            .await
            .map(|payload| OrderTotals::item_count(&payload.lines()))
            .unwrap_or(0),
        None => 0,
    };

    CartCountTemplate { count }.into_response()
}

/// Place an order from the cart contents.
#[instrument(skip(state, viewer, form))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(viewer): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let shipping_address = form.shipping_address.trim();
    if shipping_address.is_empty() {
        return Redirect::to("/cart?error=shipping_address").into_response();
    }

    match state
        .backend()
        .place_order(&viewer.token, shipping_address, &form.payment_method)
        .await
    {
        Ok(order) => {
            tracing::info!(order_id = %order.id, "Order placed");
            Redirect::to("/orders").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to place order: {e}");
            Redirect::to("/cart?error=checkout_failed").into_response()
        }
    }
}

/// Render the cart items fragment from the backend's current state.
async fn current_items_fragment(state: &AppState, token: &str) -> Response {
    let cart = match state.backend().get_cart(token).await {
        Ok(payload) => CartView::from(&payload),
        Err(e) => {
            tracing::warn!("Failed to fetch cart for fragment: {e}");
            CartView::empty()
        }
    };

    CartItemsTemplate { cart }.into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i64, quantity: u32, price: &str) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            book_id: BookId::new(id),
            title: format!("Book {id}"),
            quantity,
            unit_price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert_eq!(view.item_count, 0);
        assert_eq!(view.totals.subtotal, "$0.00");
        assert_eq!(view.totals.shipping, "$0.00");
        assert_eq!(view.totals.total, "$0.00");
    }

    #[test]
    fn test_cart_view_formats_totals() {
        let view = CartView::from_lines(&[line(1, 2, "10"), line(2, 1, "5")]);
        assert_eq!(view.totals.subtotal, "$25.00");
        assert_eq!(view.totals.shipping, "$5.99");
        assert_eq!(view.totals.tax, "$2.00");
        assert_eq!(view.totals.total, "$32.99");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items[0].line_price, "$20.00");
    }
}
