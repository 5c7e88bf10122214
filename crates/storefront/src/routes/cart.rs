//! Cart route handlers.
//!
//! Every mutation redirects back to the cart page, which re-renders from
//! the authoritative state (session for guests, server for signed-in
//! users).

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::cart::{CartLine, SelectedOption, total_quantity};
use arbor_core::{OptionId, OptionKind, ProductId};

use crate::filters;
use crate::middleware::OptionalUser;
use crate::services::CartService;
use crate::state::AppState;

use super::PageCtx;

/// Format a decimal amount as a price string.
#[must_use]
pub fn format_price(amount: &Decimal) -> String {
    format!("{:.2} EUR", amount.round_dp(2))
}

/// Cart line display data for templates.
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub option_names: Vec<String>,
}

/// Cart display data for templates.
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: format_price(&Decimal::ZERO),
            item_count: 0,
        }
    }
}

/// Resolve cart lines into display rows by looking up each product.
///
/// A line whose product can no longer be fetched is rendered with its bare
/// product id instead of being dropped.
pub async fn build_cart_view(state: &AppState, lines: &[CartLine]) -> CartView {
    let mut items = Vec::with_capacity(lines.len());
    let mut subtotal = Decimal::ZERO;

    for line in lines {
        let quantity = Decimal::from(line.quantity);
        match state.shop().product(line.product_id).await {
            Ok(product) => {
                let mut unit_price = product.base_price;
                let mut option_names = Vec::new();
                for selected in &line.options {
                    if let Some(option) = product.options.iter().find(|o| o.id == selected.id) {
                        unit_price += option.price_delta(product.base_price);
                        option_names.push(option.option_name.clone());
                    }
                }
                let line_total = unit_price * quantity;
                subtotal += line_total;
                items.push(CartItemView {
                    product_id: line.product_id,
                    name: product.name,
                    quantity: line.quantity,
                    price: format_price(&unit_price),
                    line_price: format_price(&line_total),
                    option_names,
                });
            }
            Err(e) => {
                tracing::warn!("failed to resolve cart product {}: {e}", line.product_id);
                items.push(CartItemView {
                    product_id: line.product_id,
                    name: format!("#{}", line.product_id),
                    quantity: line.quantity,
                    price: format_price(&Decimal::ZERO),
                    line_price: format_price(&Decimal::ZERO),
                    option_names: Vec::new(),
                });
            }
        }
    }

    CartView {
        item_count: total_quantity(lines),
        items,
        subtotal: format_price(&subtotal),
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageCtx,
    pub cart: CartView,
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    let service = CartService::new(&state, &session);
    let lines = service.lines(user.as_ref()).await;
    let cart = build_cart_view(&state, &lines).await;

    CartTemplate {
        ctx: PageCtx::build(&session, user).await,
        cart,
    }
}

/// Parse the add-to-cart form.
///
/// The product form posts `product_id`, `quantity`, and one `option_{id}`
/// field per checked option, valued with the option's kind.
fn parse_add_form(form: &HashMap<String, String>) -> Option<CartLine> {
    let product_id: i64 = form.get("product_id")?.parse().ok()?;
    let quantity: u32 = form
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(1);

    let mut options: Vec<SelectedOption> = form
        .iter()
        .filter_map(|(key, value)| {
            let id: i64 = key.strip_prefix("option_")?.parse().ok()?;
            let kind = match value.as_str() {
                "color" => OptionKind::Color,
                "material" => OptionKind::Material,
                "extra" => OptionKind::Extra,
                _ => return None,
            };
            Some(SelectedOption {
                id: OptionId::new(id),
                kind,
            })
        })
        .collect();
    options.sort_by_key(|o| o.id);

    Some(CartLine::new(ProductId::new(product_id), quantity, options))
}

/// Add a line to the cart (product page form).
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let Some(line) = parse_add_form(&form) else {
        return Redirect::to("/cart").into_response();
    };
    let product_id = line.product_id;

    let service = CartService::new(&state, &session);
    match service.add(user.as_ref(), line).await {
        Ok(_) => Redirect::to(&format!("/products/{product_id}?added=1")).into_response(),
        Err(e) => {
            tracing::error!("failed to add to cart: {e}");
            Redirect::to(&format!("/products/{product_id}")).into_response()
        }
    }
}

/// Form carrying a single product reference.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: i64,
}

/// Remove a product's line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<ProductForm>,
) -> Response {
    let service = CartService::new(&state, &session);
    if let Err(e) = service
        .remove(user.as_ref(), ProductId::new(form.product_id))
        .await
    {
        tracing::error!("failed to remove from cart: {e}");
    }
    Redirect::to("/cart").into_response()
}

/// Increment a product line's quantity.
#[instrument(skip(state, session))]
pub async fn increment(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<ProductForm>,
) -> Response {
    let service = CartService::new(&state, &session);
    if let Err(e) = service
        .increment(user.as_ref(), ProductId::new(form.product_id))
        .await
    {
        tracing::error!("failed to increment cart line: {e}");
    }
    Redirect::to("/cart").into_response()
}

/// Decrement a product line's quantity; removes the line at quantity one.
#[instrument(skip(state, session))]
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Form(form): Form<ProductForm>,
) -> Response {
    let service = CartService::new(&state, &session);
    if let Err(e) = service
        .decrement(user.as_ref(), ProductId::new(form.product_id))
        .await
    {
        tracing::error!("failed to decrement cart line: {e}");
    }
    Redirect::to("/cart").into_response()
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Response {
    let service = CartService::new(&state, &session);
    if let Err(e) = service.clear(user.as_ref()).await {
        tracing::error!("failed to clear cart: {e}");
    }
    Redirect::to("/cart").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        let amount: Decimal = "12.5".parse().expect("decimal");
        assert_eq!(format_price(&amount), "12.50 EUR");
    }

    #[test]
    fn test_parse_add_form_with_options() {
        let mut form = HashMap::new();
        form.insert("product_id".to_string(), "7".to_string());
        form.insert("quantity".to_string(), "2".to_string());
        form.insert("option_5".to_string(), "color".to_string());
        form.insert("option_3".to_string(), "extra".to_string());

        let line = parse_add_form(&form).expect("line");
        assert_eq!(line.product_id, ProductId::new(7));
        assert_eq!(line.quantity, 2);
        let ids: Vec<i64> = line.options.iter().map(|o| o.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 5]);
    }

    #[test]
    fn test_parse_add_form_defaults_quantity() {
        let mut form = HashMap::new();
        form.insert("product_id".to_string(), "7".to_string());

        let line = parse_add_form(&form).expect("line");
        assert_eq!(line.quantity, 1);
        assert!(line.options.is_empty());
    }

    #[test]
    fn test_parse_add_form_rejects_missing_product() {
        let form = HashMap::new();
        assert!(parse_add_form(&form).is_none());
    }

    #[test]
    fn test_parse_add_form_ignores_unknown_kind() {
        let mut form = HashMap::new();
        form.insert("product_id".to_string(), "7".to_string());
        form.insert("option_5".to_string(), "sparkle".to_string());

        let line = parse_add_form(&form).expect("line");
        assert!(line.options.is_empty());
    }
}
