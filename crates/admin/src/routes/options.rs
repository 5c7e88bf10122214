//! Product option CRUD screens.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use arbor_core::{OptionId, OptionKind, PriceModifierKind, Product, ProductId, ProductOption};

use crate::backend::types::OptionPayload;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Product option form data.
#[derive(Debug, Deserialize)]
pub struct OptionForm {
    pub product_id: i64,
    pub option_type: OptionKind,
    pub option_name: String,
    pub price_modifier_type: PriceModifierKind,
    pub price_modifier_value: Decimal,
    #[serde(default)]
    pub production_time_modifier_days: i32,
}

impl From<OptionForm> for OptionPayload {
    fn from(form: OptionForm) -> Self {
        Self {
            product_id: ProductId::new(form.product_id),
            option_type: form.option_type,
            option_name: form.option_name.trim().to_string(),
            price_modifier_type: form.price_modifier_type,
            price_modifier_value: form.price_modifier_value,
            production_time_modifier_days: form.production_time_modifier_days,
        }
    }
}

/// Option list template.
#[derive(Template, WebTemplate)]
#[template(path = "options.html")]
pub struct OptionsTemplate {
    pub options: Vec<ProductOption>,
    pub products: Vec<Product>,
}

/// Option edit template.
#[derive(Template, WebTemplate)]
#[template(path = "option_edit.html")]
pub struct OptionEditTemplate {
    pub option: ProductOption,
    pub products: Vec<Product>,
}

/// List product options with the create form.
#[instrument(skip(state, admin))]
pub async fn index(State(state): State<AppState>, admin: RequireAdmin) -> impl IntoResponse {
    let token = admin.0.token();
    let options = state.api().product_options(token).await.unwrap_or_else(|e| {
        tracing::warn!("failed to load product options: {e}");
        Vec::new()
    });
    let products = state.api().products(token).await.unwrap_or_else(|e| {
        tracing::warn!("failed to load products: {e}");
        Vec::new()
    });

    OptionsTemplate { options, products }
}

/// Create a product option.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Form(form): Form<OptionForm>,
) -> Result<Response> {
    state
        .api()
        .create_product_option(admin.0.token(), &form.into())
        .await?;
    Ok(Redirect::to("/product-options").into_response())
}

/// Display the edit form for a product option.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    let token = admin.0.token();
    let id = OptionId::new(id);
    let option = state
        .api()
        .product_options(token)
        .await?
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| AppError::NotFound(format!("product option {id}")))?;
    let products = state.api().products(token).await.unwrap_or_default();

    Ok(OptionEditTemplate { option, products }.into_response())
}

/// Update a product option.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<OptionForm>,
) -> Result<Response> {
    state
        .api()
        .update_product_option(admin.0.token(), OptionId::new(id), &form.into())
        .await?;
    Ok(Redirect::to("/product-options").into_response())
}

/// Delete a product option.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state
        .api()
        .delete_product_option(admin.0.token(), OptionId::new(id))
        .await?;
    Ok(Redirect::to("/product-options").into_response())
}
