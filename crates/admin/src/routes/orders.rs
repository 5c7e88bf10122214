//! Order management screens.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use arbor_core::{Order, OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::format_price;

/// Order row for the list template.
pub struct OrderRow {
    pub id: OrderId,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub total: String,
    pub created_at: String,
    pub eta_days: i32,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            payment_method: order.payment_method.to_string(),
            total: format_price(&order.total_price),
            created_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            eta_days: order.estimated_production_time_days,
        }
    }
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderRow>,
    pub statuses: Vec<&'static str>,
}

/// List all orders with status controls.
#[instrument(skip(state, admin))]
pub async fn index(State(state): State<AppState>, admin: RequireAdmin) -> impl IntoResponse {
    let orders = state
        .api()
        .orders(admin.0.token())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("failed to load orders: {e}");
            Vec::new()
        })
        .iter()
        .map(OrderRow::from)
        .collect();

    OrdersTemplate {
        orders,
        statuses: OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
    }
}

/// Update an order's status.
#[instrument(skip(state, admin, form))]
pub async fn update_status(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    state
        .api()
        .update_order_status(admin.0.token(), OrderId::new(id), form.status)
        .await?;
    Ok(Redirect::to("/orders").into_response())
}
