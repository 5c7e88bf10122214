//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::{OptionKind, Product, ProductId, ProductOption};

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

use super::PageCtx;
use super::cart::format_price;
use super::catalog::ProductCardView;

/// Query parameters for post-add feedback.
#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    pub added: Option<u32>,
}

/// One renderable option row: the catalog option plus display strings.
pub struct OptionView {
    pub id: i64,
    pub kind: &'static str,
    pub name: String,
    pub price_delta: String,
    pub days_delta: i32,
}

/// One option group (color/material/extra) for rendering.
pub struct OptionGroup {
    pub kind: &'static str,
    pub options: Vec<OptionView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub ctx: PageCtx,
    pub product: Product,
    pub price: String,
    pub option_groups: Vec<OptionGroup>,
    pub recommendations: Vec<ProductCardView>,
    pub added: bool,
}

fn option_view(product: &Product, option: &ProductOption) -> OptionView {
    OptionView {
        id: option.id.as_i64(),
        kind: option.option_type.as_str(),
        name: option.option_name.clone(),
        price_delta: format_price(&option.price_delta(product.base_price)),
        days_delta: option.production_time_modifier_days,
    }
}

/// Display a product with its option groups and recommendations.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
    Query(query): Query<ShowQuery>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(id);
    let product = state.shop().product(product_id).await?;

    let recommendations = state
        .shop()
        .recommendations(product_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("failed to load recommendations: {e}");
            Vec::new()
        });

    let option_groups = [OptionKind::Color, OptionKind::Material, OptionKind::Extra]
        .into_iter()
        .map(|kind| OptionGroup {
            kind: kind.as_str(),
            options: product
                .options_of_kind(kind)
                .map(|option| option_view(&product, option))
                .collect(),
        })
        .filter(|group| !group.options.is_empty())
        .collect();

    Ok(ProductTemplate {
        ctx: PageCtx::build(&session, user).await,
        price: format_price(&product.base_price),
        recommendations: recommendations.iter().map(ProductCardView::from).collect(),
        option_groups,
        product,
        added: query.added.is_some(),
    })
}
