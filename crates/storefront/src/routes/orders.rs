//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::NaiveDateTime;
use tracing::instrument;

use octavo_core::format_currency;

use crate::backend::types::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order line display data for templates.
#[derive(Clone)]
pub struct OrderItemView {
    pub title: String,
    pub quantity: i64,
    pub price: String,
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: i64,
    pub date: String,
    pub status: &'static str,
    pub total: String,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            date: format_order_date(&order.order_date),
            status: order.status.label(),
            total: format_currency(Some(order.total_amount)),
            items: order
                .order_items
                .iter()
                .map(|item| OrderItemView {
                    title: item.book.title.clone(),
                    quantity: item.quantity,
                    price: format_currency(Some(item.price)),
                })
                .collect(),
        }
    }
}

/// Format a backend order timestamp for display.
///
/// The backend emits either RFC 3339 or a zoneless `LocalDateTime`; an
/// unrecognized value is shown as-is rather than dropped.
pub fn format_order_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%b %-d, %Y %H:%M").to_string();
    }
    raw.to_string()
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
}

/// Display the logged-in user's order history.
#[instrument(skip(state, viewer))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(viewer): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = state.backend().my_orders(&viewer.token).await?;

    Ok(OrdersTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_order_date_zoneless() {
        assert_eq!(format_order_date("2026-07-01T10:15:00"), "Jul 1, 2026 10:15");
    }

    #[test]
    fn test_format_order_date_rfc3339() {
        assert_eq!(
            format_order_date("2026-07-01T10:15:00Z"),
            "Jul 1, 2026 10:15"
        );
    }

    #[test]
    fn test_format_order_date_unrecognized_passthrough() {
        assert_eq!(format_order_date("last tuesday"), "last tuesday");
    }
}
