//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Dashboard
//! GET  /health                         - Health check
//!
//! # Auth
//! GET  /login                          - Login page
//! POST /login                          - Login action (admin role required)
//! POST /logout                         - Logout action
//!
//! # Departments
//! GET  /departments                    - List + create form
//! POST /departments                    - Create
//! GET  /departments/{id}/edit          - Edit form
//! POST /departments/{id}               - Update
//! POST /departments/{id}/delete        - Delete
//!
//! # Categories (same shape)
//! GET|POST /categories, GET /categories/{id}/edit,
//! POST /categories/{id}, POST /categories/{id}/delete
//!
//! # Products (same shape, plus image upload)
//! GET|POST /products, GET /products/{id}/edit,
//! POST /products/{id}, POST /products/{id}/delete,
//! POST /products/{id}/upload
//!
//! # Product options (same shape)
//! GET|POST /product-options, GET /product-options/{id}/edit,
//! POST /product-options/{id}, POST /product-options/{id}/delete
//!
//! # Orders
//! GET  /orders                         - List all orders
//! POST /orders/{id}/status             - Update an order's status
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod departments;
pub mod options;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;

use crate::state::AppState;

/// Format a decimal amount as a price string.
#[must_use]
pub fn format_price(amount: &Decimal) -> String {
    format!("{:.2} EUR", amount.round_dp(2))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route(
            "/departments",
            get(departments::index).post(departments::create),
        )
        .route("/departments/{id}/edit", get(departments::edit_page))
        .route("/departments/{id}", post(departments::update))
        .route("/departments/{id}/delete", post(departments::delete))
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/{id}/edit", get(categories::edit_page))
        .route("/categories/{id}", post(categories::update))
        .route("/categories/{id}/delete", post(categories::delete))
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}/edit", get(products::edit_page))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        .route("/products/{id}/upload", post(products::upload_image))
        .route("/product-options", get(options::index).post(options::create))
        .route("/product-options/{id}/edit", get(options::edit_page))
        .route("/product-options/{id}", post(options::update))
        .route("/product-options/{id}/delete", post(options::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
}
