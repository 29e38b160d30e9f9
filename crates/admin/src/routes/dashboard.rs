//! Dashboard handler: store-wide tallies at a glance.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use octavo_core::{OrderStatus, format_currency};

use crate::backend::types::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::orders::OrderRow;
use crate::state::AppState;

/// Count of orders in one status.
#[derive(Clone)]
pub struct StatusCount {
    pub label: &'static str,
    pub count: usize,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub order_count: usize,
    pub revenue: String,
    pub user_count: usize,
    pub book_count: i64,
    pub status_counts: Vec<StatusCount>,
    pub recent_orders: Vec<OrderRow>,
}

/// Number of recent orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// Display the dashboard.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = state.backend().all_orders(&admin.token).await?;
    let users = state.backend().list_users(&admin.token).await?;
    let books = state.backend().list_books(0, 1).await?;

    let revenue = orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| order.total_amount)
        .sum();

    let status_counts = OrderStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            label: status.label(),
            count: count_status(&orders, status),
        })
        .collect();

    let recent_orders = orders.iter().take(RECENT_ORDERS).map(OrderRow::from).collect();

    Ok(DashboardTemplate {
        admin_name: admin.user.username.clone(),
        order_count: orders.len(),
        revenue: format_currency(Some(revenue)),
        user_count: users.len(),
        book_count: books.total_elements,
        status_counts,
        recent_orders,
    })
}

fn count_status(orders: &[Order], status: OrderStatus) -> usize {
    orders.iter().filter(|o| o.status == status).count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(id: i64, status: &str, total: &str) -> Order {
        serde_json::from_value(json!({
            "id": id,
            "status": status,
            "totalAmount": total,
            "orderItems": [],
        }))
        .unwrap()
    }

    #[test]
    fn test_count_status() {
        let orders = vec![
            order(1, "PENDING", "10"),
            order(2, "PENDING", "20"),
            order(3, "SHIPPED", "30"),
        ];
        assert_eq!(count_status(&orders, OrderStatus::Pending), 2);
        assert_eq!(count_status(&orders, OrderStatus::Cancelled), 0);
    }
}
