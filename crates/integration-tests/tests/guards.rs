//! Route access control: the policy table's four deny behaviors.

use arbor_integration_tests::{ADMIN_EMAIL, CUSTOMER_EMAIL, TestContext, location};

#[tokio::test]
async fn orders_while_logged_out_redirects_to_login_with_return_path() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.url("/orders"))
        .send()
        .await
        .expect("request orders");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?next=%2Forders");
}

#[tokio::test]
async fn login_returns_to_the_originally_requested_route() {
    let ctx = TestContext::new().await;

    // Hit the guarded page first, then follow the login flow it points to.
    let denied = ctx
        .client
        .get(ctx.url("/orders"))
        .send()
        .await
        .expect("request orders");
    assert_eq!(location(&denied), "/login?next=%2Forders");

    let response = ctx.login(CUSTOMER_EMAIL, "/orders").await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/orders");

    // And the page renders now.
    let orders = ctx
        .client
        .get(ctx.url("/orders"))
        .send()
        .await
        .expect("request orders");
    assert!(orders.status().is_success());
}

#[tokio::test]
async fn customer_orders_page_redirects_admins_home() {
    let ctx = TestContext::new().await;

    let response = ctx.login(ADMIN_EMAIL, "/").await;
    assert!(response.status().is_redirection());

    let denied = ctx
        .client
        .get(ctx.url("/orders"))
        .send()
        .await
        .expect("request orders");
    assert!(denied.status().is_redirection());
    assert_eq!(location(&denied), "/");
}

#[tokio::test]
async fn login_page_redirects_authenticated_users_home() {
    let ctx = TestContext::new().await;

    ctx.login(CUSTOMER_EMAIL, "/").await;

    let response = ctx
        .client
        .get(ctx.url("/login"))
        .send()
        .await
        .expect("request login page");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn checkout_requires_authentication() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(ctx.url("/checkout"))
        .send()
        .await
        .expect("request checkout");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login?next=%2Fcheckout");
}

#[tokio::test]
async fn bad_credentials_bounce_back_to_login() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .post(ctx.url("/login"))
        .form(&[
            ("email", CUSTOMER_EMAIL),
            ("password", "wrong-password"),
            ("next", "/"),
        ])
        .send()
        .await
        .expect("send login");

    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("/login?error="));
}
