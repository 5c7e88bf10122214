//! Admin dashboard: entity counts at a glance.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub department_count: usize,
    pub category_count: usize,
    pub product_count: usize,
    pub order_count: usize,
}

/// Display the dashboard.
#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn index(
    State(state): State<AppState>,
    admin: RequireAdmin,
) -> impl IntoResponse {
    let token = admin.0.token();

    // Failed loads show zero rather than an error page.
    let department_count = state.api().departments(token).await.map_or(0, |d| d.len());
    let category_count = state.api().categories(token).await.map_or(0, |c| c.len());
    let product_count = state.api().products(token).await.map_or(0, |p| p.len());
    let order_count = state.api().orders(token).await.map_or(0, |o| o.len());

    DashboardTemplate {
        admin_name: admin.0.name,
        department_count,
        category_count,
        product_count,
        order_count,
    }
}
