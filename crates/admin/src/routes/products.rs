//! Product CRUD screens, including image upload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use arbor_core::{Category, CategoryId, Product, ProductId};

use crate::backend::types::ProductPayload;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::format_price;

/// Product form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub base_price: Decimal,
    pub base_production_time_days: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub base_material: String,
    #[serde(default)]
    pub default_width: i32,
    #[serde(default)]
    pub default_height: i32,
    #[serde(default)]
    pub default_depth: i32,
    /// Checkbox: present ("on") when checked, absent otherwise.
    #[serde(default)]
    pub is_made_to_order: Option<String>,
}

impl From<ProductForm> for ProductPayload {
    fn from(form: ProductForm) -> Self {
        Self {
            category_id: CategoryId::new(form.category_id),
            name: form.name.trim().to_string(),
            short_description: form.short_description.trim().to_string(),
            long_description: form.long_description.trim().to_string(),
            base_price: form.base_price,
            base_production_time_days: form.base_production_time_days,
            image_url: form.image_url.trim().to_string(),
            base_material: form.base_material.trim().to_string(),
            default_width: form.default_width,
            default_height: form.default_height,
            default_depth: form.default_depth,
            is_made_to_order: form.is_made_to_order.is_some(),
        }
    }
}

fn payload_from_product(product: &Product) -> ProductPayload {
    ProductPayload {
        category_id: product.category_id,
        name: product.name.clone(),
        short_description: product.short_description.clone(),
        long_description: product.long_description.clone(),
        base_price: product.base_price,
        base_production_time_days: product.base_production_time_days,
        image_url: product.image_url.clone(),
        base_material: product.base_material.clone(),
        default_width: product.default_width,
        default_height: product.default_height,
        default_depth: product.default_depth,
        is_made_to_order: product.is_made_to_order,
    }
}

/// Product row for the list template.
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub production_days: i32,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub products: Vec<ProductRow>,
    pub categories: Vec<Category>,
}

/// Product edit template.
#[derive(Template, WebTemplate)]
#[template(path = "product_edit.html")]
pub struct ProductEditTemplate {
    pub product: Product,
    pub categories: Vec<Category>,
}

async fn find_product(state: &AppState, token: &str, id: ProductId) -> Result<Product> {
    state
        .api()
        .products(token)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List products with the create form.
#[instrument(skip(state, admin))]
pub async fn index(State(state): State<AppState>, admin: RequireAdmin) -> impl IntoResponse {
    let token = admin.0.token();
    let products = state
        .api()
        .products(token)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("failed to load products: {e}");
            Vec::new()
        })
        .iter()
        .map(|p| ProductRow {
            id: p.id,
            name: p.name.clone(),
            price: format_price(&p.base_price),
            production_days: p.base_production_time_days,
        })
        .collect();
    let categories = state.api().categories(token).await.unwrap_or_else(|e| {
        tracing::warn!("failed to load categories: {e}");
        Vec::new()
    });

    ProductsTemplate {
        products,
        categories,
    }
}

/// Create a product.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    state
        .api()
        .create_product(admin.0.token(), &form.into())
        .await?;
    Ok(Redirect::to("/products").into_response())
}

/// Display the edit form for a product.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    let token = admin.0.token();
    let product = find_product(&state, token, ProductId::new(id)).await?;
    let categories = state.api().categories(token).await.unwrap_or_default();

    Ok(ProductEditTemplate {
        product,
        categories,
    }
    .into_response())
}

/// Update a product.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    state
        .api()
        .update_product(admin.0.token(), ProductId::new(id), &form.into())
        .await?;
    Ok(Redirect::to("/products").into_response())
}

/// Delete a product.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state
        .api()
        .delete_product(admin.0.token(), ProductId::new(id))
        .await?;
    Ok(Redirect::to("/products").into_response())
}

/// Upload a product image.
///
/// Proxies the file to the backend's upload endpoint, then points the
/// product's `image_url` at the stored copy.
#[instrument(skip(state, admin, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Response> {
    let token = admin.0.token();
    let product_id = ProductId::new(id);

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;
            upload = Some((file_name, bytes.to_vec()));
        }
    }

    let Some((file_name, bytes)) = upload else {
        return Err(AppError::BadRequest("no file in upload".to_string()));
    };

    let stored = state.api().upload_image(token, &file_name, bytes).await?;

    let product = find_product(&state, token, product_id).await?;
    let mut payload = payload_from_product(&product);
    payload.image_url = stored.url;
    state
        .api()
        .update_product(token, product_id, &payload)
        .await?;

    Ok(Redirect::to(&format!("/products/{product_id}/edit")).into_response())
}
