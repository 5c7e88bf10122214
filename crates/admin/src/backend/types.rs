//! Request and response payloads for the backend's admin surface.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arbor_core::{CategoryId, DepartmentId, OptionKind, OrderStatus, PriceModifierKind, ProductId};

/// Body for `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body for department create/update.
#[derive(Debug, Serialize)]
pub struct DepartmentPayload {
    pub name: String,
    pub description: String,
}

/// Body for category create/update.
#[derive(Debug, Serialize)]
pub struct CategoryPayload {
    pub department_id: DepartmentId,
    pub name: String,
    pub description: String,
}

/// Body for product create/update.
#[derive(Debug, Serialize)]
pub struct ProductPayload {
    pub category_id: CategoryId,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub base_price: Decimal,
    pub base_production_time_days: i32,
    pub image_url: String,
    pub base_material: String,
    pub default_width: i32,
    pub default_height: i32,
    pub default_depth: i32,
    pub is_made_to_order: bool,
}

/// Body for product option create/update.
#[derive(Debug, Serialize)]
pub struct OptionPayload {
    pub product_id: ProductId,
    pub option_type: OptionKind,
    pub option_name: String,
    pub price_modifier_type: PriceModifierKind,
    pub price_modifier_value: Decimal,
    pub production_time_modifier_days: i32,
}

/// Response of `POST /admin/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Body for `PATCH /admin/orders/{id}/status`.
#[derive(Debug, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Marker for ignored response bodies.
#[derive(Debug, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
