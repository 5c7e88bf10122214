//! Cart behavior: guest keying, login-time reconciliation, decrements.

use arbor_integration_tests::{CUSTOMER_EMAIL, TestContext};

#[tokio::test]
async fn repeat_guest_add_merges_into_one_line() {
    let ctx = TestContext::new().await;

    ctx.add_to_cart(7, 2).await;
    ctx.add_to_cart(7, 1).await;

    let page = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .expect("request cart")
        .text()
        .await
        .expect("cart body");

    // One line for product 7 with the quantities summed: 3 x 100.00.
    assert_eq!(page.matches("Oak Table").count(), 1);
    assert!(page.contains("300.00 EUR"));
}

#[tokio::test]
async fn login_merges_guest_cart_with_server_cart() {
    let ctx = TestContext::new().await;

    // Server already remembers a cart for this account.
    ctx.stub.seed_cart(1, vec![(7, 1, "[]"), (9, 1, "[]")]);

    // Guest adds more of product 7 while logged out.
    ctx.add_to_cart(7, 2).await;

    ctx.login(CUSTOMER_EMAIL, "/").await;

    // Shared key summed, one-sided line kept, nothing dropped.
    let mut snapshot = ctx.stub.cart_snapshot(1);
    snapshot.sort_unstable();
    assert_eq!(snapshot, vec![(7, 3), (9, 1)]);

    let page = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .expect("request cart")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("Oak Table"));
    assert!(page.contains("Ash Chair"));
}

#[tokio::test]
async fn login_with_empty_guest_cart_adopts_server_cart_without_write() {
    let ctx = TestContext::new().await;

    ctx.stub.seed_cart(1, vec![(9, 2, "[]")]);

    ctx.login(CUSTOMER_EMAIL, "/").await;

    // Server cart untouched.
    assert_eq!(ctx.stub.cart_snapshot(1), vec![(9, 2)]);

    let page = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .expect("request cart")
        .text()
        .await
        .expect("cart body");
    assert!(page.contains("Ash Chair"));
    assert!(page.contains("80.00 EUR"));
}

#[tokio::test]
async fn decrement_at_quantity_one_removes_the_line() {
    let ctx = TestContext::new().await;

    ctx.stub.seed_cart(1, vec![(7, 1, "[]"), (9, 4, "[]")]);
    ctx.login(CUSTOMER_EMAIL, "/").await;

    ctx.client
        .post(ctx.url("/cart/decrement"))
        .form(&[("product_id", "7")])
        .send()
        .await
        .expect("send decrement");

    // Product 7 gone, product 9 untouched.
    assert_eq!(ctx.stub.cart_snapshot(1), vec![(9, 4)]);
}

#[tokio::test]
async fn decrement_above_one_subtracts_exactly_one() {
    let ctx = TestContext::new().await;

    ctx.stub.seed_cart(1, vec![(9, 4, "[]")]);
    ctx.login(CUSTOMER_EMAIL, "/").await;

    ctx.client
        .post(ctx.url("/cart/decrement"))
        .form(&[("product_id", "9")])
        .send()
        .await
        .expect("send decrement");

    assert_eq!(ctx.stub.cart_snapshot(1), vec![(9, 3)]);
}

#[tokio::test]
async fn authenticated_add_goes_through_the_server() {
    let ctx = TestContext::new().await;

    ctx.login(CUSTOMER_EMAIL, "/").await;
    ctx.add_to_cart(9, 2).await;

    assert_eq!(ctx.stub.cart_snapshot(1), vec![(9, 2)]);
}
