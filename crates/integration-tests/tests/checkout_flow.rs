//! Checkout: the three-state flow, gateway redirect, and card validation.

use arbor_integration_tests::{CUSTOMER_EMAIL, TestContext, location};

const ORDER_FORM: [(&str, &str); 4] = [
    ("name", "Iva Petrova"),
    ("email", "iva@example.com"),
    ("phone", "+359 888 123456"),
    ("address", "12 Vitosha Blvd, Sofia"),
];

fn order_form(payment_method: &str) -> Vec<(&str, &str)> {
    let mut form = ORDER_FORM.to_vec();
    form.push(("payment_method", payment_method));
    form
}

async fn signed_in_with_cart(ctx: &TestContext) {
    ctx.login(CUSTOMER_EMAIL, "/").await;
    ctx.add_to_cart(7, 1).await;
}

#[tokio::test]
async fn bank_transfer_completes_immediately_and_clears_the_cart() {
    let ctx = TestContext::new().await;
    signed_in_with_cart(&ctx).await;

    let response = ctx
        .client
        .post(ctx.url("/checkout"))
        .form(&order_form("bank"))
        .send()
        .await
        .expect("send checkout");

    assert!(response.status().is_success());
    let page = response.text().await.expect("checkout body");
    assert!(page.contains("Order created successfully"));
    assert!(ctx.stub.cart_snapshot(1).is_empty());
}

#[tokio::test]
async fn card_checkout_redirects_to_the_gateway_url() {
    let ctx = TestContext::new().await;
    ctx.stub.enable_gateway("https://pay.example");
    signed_in_with_cart(&ctx).await;

    let response = ctx
        .client
        .post(ctx.url("/checkout"))
        .form(&order_form("card"))
        .send()
        .await
        .expect("send checkout");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "https://pay.example/session/1");
}

#[tokio::test]
async fn gateway_return_clears_cart_and_shows_the_order() {
    let ctx = TestContext::new().await;
    ctx.stub.enable_gateway("https://pay.example");
    signed_in_with_cart(&ctx).await;

    ctx.client
        .post(ctx.url("/checkout"))
        .form(&order_form("card"))
        .send()
        .await
        .expect("send checkout");

    let response = ctx
        .client
        .get(ctx.url("/checkout/success?order_id=1"))
        .send()
        .await
        .expect("request success page");

    assert!(response.status().is_success());
    let page = response.text().await.expect("success body");
    assert!(page.contains("Payment completed."));
    assert!(page.contains("100.00 EUR"));
    assert!(ctx.stub.cart_snapshot(1).is_empty());
}

#[tokio::test]
async fn card_without_gateway_moves_to_the_pay_form() {
    let ctx = TestContext::new().await;
    signed_in_with_cart(&ctx).await;

    let response = ctx
        .client
        .post(ctx.url("/checkout"))
        .form(&order_form("card"))
        .send()
        .await
        .expect("send checkout");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/checkout/pay/1");
}

#[tokio::test]
async fn invalid_card_number_is_rejected_before_any_payment_call() {
    let ctx = TestContext::new().await;
    signed_in_with_cart(&ctx).await;

    ctx.client
        .post(ctx.url("/checkout"))
        .form(&order_form("card"))
        .send()
        .await
        .expect("send checkout");

    let response = ctx
        .client
        .post(ctx.url("/checkout/pay/1"))
        .form(&[
            ("cardholder_name", "Iva Petrova"),
            ("card_number", "4242424242424243"), // fails the checksum
            ("expiry_month", "12"),
            ("expiry_year", "2044"),
            ("cvv", "123"),
        ])
        .send()
        .await
        .expect("send payment");

    assert!(response.status().is_success());
    let page = response.text().await.expect("pay body");
    assert!(page.contains("invalid card number"));

    // The order was never paid.
    assert_eq!(
        ctx.stub.order_payment_status(1).as_deref(),
        Some("pending")
    );
}

#[tokio::test]
async fn valid_card_pays_the_order_and_clears_the_cart() {
    let ctx = TestContext::new().await;
    signed_in_with_cart(&ctx).await;

    ctx.client
        .post(ctx.url("/checkout"))
        .form(&order_form("card"))
        .send()
        .await
        .expect("send checkout");

    let response = ctx
        .client
        .post(ctx.url("/checkout/pay/1"))
        .form(&[
            ("cardholder_name", "Iva Petrova"),
            ("card_number", "4242 4242 4242 4242"),
            ("expiry_month", "12"),
            ("expiry_year", "44"),
            ("cvv", "123"),
        ])
        .send()
        .await
        .expect("send payment");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/checkout/success?order_id=1");
    assert_eq!(ctx.stub.order_payment_status(1).as_deref(), Some("paid"));
    assert!(ctx.stub.cart_snapshot(1).is_empty());
}

#[tokio::test]
async fn checkout_with_an_empty_cart_returns_to_the_cart_page() {
    let ctx = TestContext::new().await;
    ctx.login(CUSTOMER_EMAIL, "/").await;

    let response = ctx
        .client
        .get(ctx.url("/checkout"))
        .send()
        .await
        .expect("request checkout");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/cart");
}
