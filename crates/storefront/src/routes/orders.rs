//! Customer order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::{Order, OrderId, ProductId};

use crate::filters;
use crate::middleware::RequireUser;
use crate::state::AppState;

use super::PageCtx;
use super::cart::format_price;

/// Order line display data for templates.
pub struct OrderItemView {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Order display data for templates.
pub struct OrderView {
    pub id: OrderId,
    pub status: String,
    pub payment_status: String,
    pub total: String,
    pub eta_days: i32,
    pub created_at: String,
    pub ready_by: String,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            total: format_price(&order.total_price),
            eta_days: order.estimated_production_time_days,
            created_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ready_by: order.estimated_ready_date().format("%Y-%m-%d").to_string(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: format_price(&item.unit_price),
                    line_total: format_price(&item.line_total),
                })
                .collect(),
        }
    }
}

/// Query parameters: which order to show expanded.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub expand: Option<i64>,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub ctx: PageCtx,
    pub orders: Vec<OrderView>,
    pub expanded: Option<OrderView>,
}

/// Display the signed-in user's orders, optionally with one expanded.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Query(query): Query<OrdersQuery>,
) -> impl IntoResponse {
    let orders = match state.shop().my_orders(user.token()).await {
        Ok(orders) => orders.iter().map(OrderView::from).collect(),
        Err(e) => {
            tracing::warn!("failed to load orders: {e}");
            Vec::new()
        }
    };

    let expanded = match query.expand {
        Some(id) => match state.shop().my_order(user.token(), OrderId::new(id)).await {
            Ok(order) => Some(OrderView::from(&order)),
            Err(e) => {
                tracing::warn!("failed to load order {id}: {e}");
                None
            }
        },
        None => None,
    };

    OrdersTemplate {
        ctx: PageCtx::build(&session, Some(user)).await,
        orders,
        expanded,
    }
}
