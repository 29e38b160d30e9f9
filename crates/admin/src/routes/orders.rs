//! Order management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::instrument;

use octavo_core::{OrderId, OrderStatus, format_currency};

use crate::backend::types::Order;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Order display data for the management table.
#[derive(Clone)]
pub struct OrderRow {
    pub id: i64,
    pub date: String,
    pub status: &'static str,
    pub status_value: &'static str,
    pub total: String,
    pub user_id: Option<i64>,
    pub item_count: usize,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            date: format_order_date(&order.order_date),
            status: order.status.label(),
            status_value: status_value(order.status),
            total: format_currency(Some(order.total_amount)),
            user_id: order.user_id.map(|id| id.as_i64()),
            item_count: order.order_items.len(),
        }
    }
}

/// Wire value for a status (for the selector form).
const fn status_value(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "PENDING",
        OrderStatus::Processing => "PROCESSING",
        OrderStatus::Shipped => "SHIPPED",
        OrderStatus::Delivered => "DELIVERED",
        OrderStatus::Cancelled => "CANCELLED",
    }
}

/// All selectable statuses as (wire value, label) pairs.
#[must_use]
pub fn status_options() -> Vec<(&'static str, &'static str)> {
    OrderStatus::ALL
        .iter()
        .map(|&s| (status_value(s), s.label()))
        .collect()
}

/// Format a backend order timestamp for display.
fn format_order_date(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%b %-d, %Y %H:%M").to_string();
    }
    raw.to_string()
}

/// Order management page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderRow>,
    pub statuses: Vec<(&'static str, &'static str)>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Display all orders.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = state.backend().all_orders(&admin.token).await?;

    Ok(OrdersTemplate {
        orders: orders.iter().map(OrderRow::from).collect(),
        statuses: status_options(),
    })
}

/// Move an order to a new status.
#[instrument(skip(state, admin))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<impl IntoResponse> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    state
        .backend()
        .update_order_status(&admin.token, OrderId::new(id), status)
        .await?;

    tracing::info!(order_id = id, status = %status, "Order status updated");
    Ok(Redirect::to("/orders"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_options_cover_lifecycle() {
        let options = status_options();
        assert_eq!(options.len(), 5);
        assert!(options.contains(&("SHIPPED", "Shipped")));
    }

    #[test]
    fn test_status_value_round_trips() {
        for status in OrderStatus::ALL {
            assert_eq!(status_value(status).parse::<OrderStatus>(), Ok(status));
        }
    }
}
