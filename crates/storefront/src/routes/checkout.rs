//! Checkout flow.
//!
//! Three states, one per URL:
//!
//! - `/checkout` (collecting order details) - contact/address form plus the
//!   payment method
//! - `/checkout/pay/{id}` (awaiting payment) - card form, reached only when
//!   the payment method is card and the backend returned no gateway URL
//! - complete - immediately after order creation for bank transfer, after a
//!   successful card payment, or on the gateway's success return
//!
//! Card number and expiry are validated before any network call. A failure
//! at order creation or payment re-renders the current state with a notice;
//! there is no retry loop beyond resubmitting the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Datelike;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::payment::{CardDetails, validate_card};
use arbor_core::{OrderId, PaymentMethod};

use crate::backend::types::{CreateOrderRequest, OrderItemPayload, PayOrderRequest};
use crate::filters;
use crate::middleware::RequireUser;
use crate::services::CartService;
use crate::state::AppState;

use super::PageCtx;
use super::cart::{CartView, build_cart_view};
use super::orders::OrderView;

// =============================================================================
// Form Types
// =============================================================================

/// Order details form data.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
}

/// Card payment form data.
#[derive(Debug, Deserialize)]
pub struct CardForm {
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

/// Validate the order form the way the checkout page promises.
fn validate_order_form(form: &OrderForm) -> std::result::Result<(), &'static str> {
    if form.name.trim().len() < 2 {
        return Err("Name must be at least 2 characters");
    }
    let email = form.email.trim();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err("Enter a valid email");
    }
    let phone = form.phone.trim();
    let phone_ok = (7..=20).contains(&phone.len())
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '));
    if !phone_ok {
        return Err("Enter a valid phone number");
    }
    if form.address.trim().len() < 5 {
        return Err("Address must be at least 5 characters");
    }
    Ok(())
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template (collecting and bank-complete states).
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub ctx: PageCtx,
    pub cart: CartView,
    pub error: Option<String>,
    pub placed: bool,
}

/// Card payment page template (awaiting-payment state).
#[derive(Template, WebTemplate)]
#[template(path = "checkout_pay.html")]
pub struct PayTemplate {
    pub ctx: PageCtx,
    pub order_id: OrderId,
    pub error: Option<String>,
}

/// Gateway success-return template.
#[derive(Template, WebTemplate)]
#[template(path = "payment_success.html")]
pub struct PaymentSuccessTemplate {
    pub ctx: PageCtx,
    pub order: Option<OrderView>,
}

/// Gateway cancel-return template.
#[derive(Template, WebTemplate)]
#[template(path = "payment_cancel.html")]
pub struct PaymentCancelTemplate {
    pub ctx: PageCtx,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the order details form.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> Response {
    let service = CartService::new(&state, &session);
    let lines = service.lines(Some(&user)).await;
    if lines.is_empty() {
        return Redirect::to("/cart").into_response();
    }
    let cart = build_cart_view(&state, &lines).await;

    CheckoutTemplate {
        ctx: PageCtx::build(&session, Some(user)).await,
        cart,
        error: None,
        placed: false,
    }
    .into_response()
}

/// Create the order.
///
/// Bank transfer completes immediately; card either redirects to the
/// gateway checkout URL or moves to the card form.
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Form(form): Form<OrderForm>,
) -> Response {
    let service = CartService::new(&state, &session);
    let lines = service.lines(Some(&user)).await;
    if lines.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    if let Err(message) = validate_order_form(&form) {
        let cart = build_cart_view(&state, &lines).await;
        return CheckoutTemplate {
            ctx: PageCtx::build(&session, Some(user)).await,
            cart,
            error: Some(message.to_string()),
            placed: false,
        }
        .into_response();
    }

    let request = CreateOrderRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        address: form.address.trim().to_string(),
        payment_method: form.payment_method,
        items: lines.iter().map(OrderItemPayload::from).collect(),
    };

    match state.shop().create_order(user.token(), &request).await {
        Ok(response) => match form.payment_method {
            PaymentMethod::Bank => {
                if let Err(e) = service.clear(Some(&user)).await {
                    tracing::error!("failed to clear cart after order: {e}");
                }
                CheckoutTemplate {
                    ctx: PageCtx::build(&session, Some(user)).await,
                    cart: CartView::empty(),
                    error: None,
                    placed: true,
                }
                .into_response()
            }
            PaymentMethod::Card => match response.checkout_url {
                Some(url) => Redirect::to(&url).into_response(),
                None => {
                    Redirect::to(&format!("/checkout/pay/{}", response.order_id)).into_response()
                }
            },
        },
        Err(e) => {
            tracing::error!("failed to create order: {e}");
            let ctx = PageCtx::build(&session, Some(user)).await;
            let error = Some(ctx.t("checkout.error").to_string());
            let cart = build_cart_view(&state, &lines).await;
            CheckoutTemplate {
                ctx,
                cart,
                error,
                placed: false,
            }
            .into_response()
        }
    }
}

/// Display the card payment form.
#[instrument(skip(session))]
pub async fn pay_page(
    session: Session,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> Response {
    PayTemplate {
        ctx: PageCtx::build(&session, Some(user)).await,
        order_id: OrderId::new(id),
        error: None,
    }
    .into_response()
}

/// Submit the card payment.
///
/// The checksum and expiry checks run before any network call.
#[instrument(skip(state, session, form))]
pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(form): Form<CardForm>,
) -> Response {
    let order_id = OrderId::new(id);
    let card = CardDetails {
        cardholder_name: form.cardholder_name,
        card_number: form.card_number,
        expiry_month: form.expiry_month,
        expiry_year: form.expiry_year,
        cvv: form.cvv,
    };

    let today = chrono::Utc::now();
    if let Err(e) = validate_card(&card, today.year(), today.month()) {
        return PayTemplate {
            ctx: PageCtx::build(&session, Some(user)).await,
            order_id,
            error: Some(e.to_string()),
        }
        .into_response();
    }

    let request = PayOrderRequest {
        cardholder_name: card.cardholder_name.trim().to_string(),
        card_number: arbor_core::payment::normalize_card_number(&card.card_number),
        expiry_month: card.expiry_month.trim().to_string(),
        expiry_year: card.expiry_year.trim().to_string(),
        cvv: card.cvv.trim().to_string(),
    };

    match state.shop().pay_order(user.token(), order_id, &request).await {
        Ok(_) => {
            let service = CartService::new(&state, &session);
            if let Err(e) = service.clear(Some(&user)).await {
                tracing::error!("failed to clear cart after payment: {e}");
            }
            Redirect::to(&format!("/checkout/success?order_id={order_id}")).into_response()
        }
        Err(e) => {
            tracing::error!("card payment failed: {e}");
            let ctx = PageCtx::build(&session, Some(user)).await;
            let error = Some(ctx.t("checkout.pay.error").to_string());
            PayTemplate {
                ctx,
                order_id,
                error,
            }
            .into_response()
        }
    }
}

/// Query parameters for the gateway success return.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub order_id: Option<i64>,
}

/// Gateway success return: clears the cart and shows the order expanded.
#[instrument(skip(state, session))]
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Query(query): Query<SuccessQuery>,
) -> Response {
    let service = CartService::new(&state, &session);
    if let Err(e) = service.clear(Some(&user)).await {
        tracing::error!("failed to clear cart on payment return: {e}");
    }

    let order = match query.order_id {
        Some(id) => match state.shop().my_order(user.token(), OrderId::new(id)).await {
            Ok(order) => Some(OrderView::from(&order)),
            Err(e) => {
                tracing::warn!("failed to load order {id} on payment return: {e}");
                None
            }
        },
        None => None,
    };

    PaymentSuccessTemplate {
        ctx: PageCtx::build(&session, Some(user)).await,
        order,
    }
    .into_response()
}

/// Gateway cancel return.
#[instrument(skip(session))]
pub async fn cancel(session: Session, RequireUser(user): RequireUser) -> Response {
    PaymentCancelTemplate {
        ctx: PageCtx::build(&session, Some(user)).await,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(method: PaymentMethod) -> OrderForm {
        OrderForm {
            name: "Iva Petrova".to_string(),
            email: "iva@example.com".to_string(),
            phone: "+359 888 123".to_string(),
            address: "12 Vitosha Blvd".to_string(),
            payment_method: method,
        }
    }

    #[test]
    fn test_valid_order_form() {
        assert_eq!(validate_order_form(&form(PaymentMethod::Card)), Ok(()));
    }

    #[test]
    fn test_short_name_rejected() {
        let mut bad = form(PaymentMethod::Card);
        bad.name = "I".to_string();
        assert!(validate_order_form(&bad).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut bad = form(PaymentMethod::Bank);
        bad.email = "not-an-email".to_string();
        assert!(validate_order_form(&bad).is_err());
    }

    #[test]
    fn test_bad_phone_rejected() {
        let mut bad = form(PaymentMethod::Bank);
        bad.phone = "abc".to_string();
        assert!(validate_order_form(&bad).is_err());
    }

    #[test]
    fn test_short_address_rejected() {
        let mut bad = form(PaymentMethod::Bank);
        bad.address = "x".to_string();
        assert!(validate_order_form(&bad).is_err());
    }
}
