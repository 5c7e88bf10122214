//! Catalog drill-down: department -> category -> products, plus search.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::{Category, CategoryId, Department, DepartmentId, Product, ProductId};

use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

use super::PageCtx;
use super::cart::format_price;

/// Product listing card for templates.
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub short_description: String,
    pub image_url: String,
    pub price: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            short_description: product.short_description.clone(),
            image_url: product.image_url.clone(),
            price: format_price(&product.base_price),
        }
    }
}

/// Query parameters for the catalog page.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub department_id: Option<i64>,
    pub category_id: Option<i64>,
    pub query: Option<String>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub ctx: PageCtx,
    pub departments: Vec<Department>,
    pub categories: Vec<Category>,
    pub products: Vec<ProductCardView>,
    pub query: String,
}

/// Display the catalog page.
///
/// A search query takes precedence over the drill-down; otherwise products
/// load once a category is selected.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(params): Query<CatalogQuery>,
) -> impl IntoResponse {
    let shop = state.shop();

    let departments = shop.departments().await.unwrap_or_else(|e| {
        tracing::warn!("failed to load departments: {e}");
        Vec::new()
    });

    let categories = match params.department_id {
        Some(id) => shop
            .categories(DepartmentId::new(id))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("failed to load categories: {e}");
                Vec::new()
            }),
        None => Vec::new(),
    };

    let search = params.query.as_deref().unwrap_or("").trim().to_string();
    let products = if search.is_empty() {
        match params.category_id {
            Some(id) => shop
                .products_by_category(CategoryId::new(id))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("failed to load products: {e}");
                    Vec::new()
                }),
            None => Vec::new(),
        }
    } else {
        shop.search_products(&search).await.unwrap_or_else(|e| {
            tracing::warn!("product search failed: {e}");
            Vec::new()
        })
    };
    let products = products.iter().map(ProductCardView::from).collect();

    CatalogTemplate {
        ctx: PageCtx::build(&session, user).await,
        departments,
        categories,
        products,
        query: search,
    }
}
