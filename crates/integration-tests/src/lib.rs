//! Integration test harness for Arbor.
//!
//! Spins up two real servers on ephemeral ports: a stub of the commerce
//! backend (in-memory carts, orders, and two fixed accounts) and the actual
//! storefront application pointed at it. Tests drive the storefront with a
//! cookie-holding `reqwest` client, redirects disabled so guard behavior
//! stays observable.
//!
//! # Fixed accounts
//!
//! | email                | password    | role     |
//! |----------------------|-------------|----------|
//! | iva@example.com      | secret-123  | customer |
//! | admin@example.com    | secret-123  | admin    |
//!
//! # Fixed catalog
//!
//! Products 7 ("Oak Table", 100.00 EUR) and 9 ("Ash Chair", 40.00 EUR),
//! both in department 1 / category 1, product 7 with one color option.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use arbor_storefront::config::StorefrontConfig;
use arbor_storefront::state::AppState;

pub const CUSTOMER_EMAIL: &str = "iva@example.com";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "secret-123";

const CUSTOMER_TOKEN: &str = "tok-1";
const ADMIN_TOKEN: &str = "tok-2";

/// One line of a stub-held cart.
#[derive(Clone)]
pub struct StubCartItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: u32,
    pub selected_options_json: String,
}

/// Shared state of the stub backend, inspectable from tests.
pub struct StubState {
    /// user id -> cart lines
    pub carts: Mutex<HashMap<i64, Vec<StubCartItem>>>,
    /// recorded orders (wire-format JSON objects)
    pub orders: Mutex<Vec<Value>>,
    /// base URL handed back as `checkout_url` for card orders, if any
    pub gateway_url: Mutex<Option<String>>,
    next_cart_item_id: AtomicI64,
    next_order_id: AtomicI64,
}

impl StubState {
    fn new() -> Self {
        Self {
            carts: Mutex::new(HashMap::new()),
            orders: Mutex::new(Vec::new()),
            gateway_url: Mutex::new(None),
            next_cart_item_id: AtomicI64::new(1),
            next_order_id: AtomicI64::new(1),
        }
    }

    /// Pre-seed a user's server-held cart.
    pub fn seed_cart(&self, user_id: i64, items: Vec<(i64, u32, &str)>) {
        let mut carts = self.carts.lock().expect("carts lock");
        let lines = items
            .into_iter()
            .map(|(product_id, quantity, options)| StubCartItem {
                id: self.next_cart_item_id.fetch_add(1, Ordering::SeqCst),
                product_id,
                quantity,
                selected_options_json: options.to_string(),
            })
            .collect();
        carts.insert(user_id, lines);
    }

    /// Snapshot a user's server-held cart as (product id, quantity) pairs.
    pub fn cart_snapshot(&self, user_id: i64) -> Vec<(i64, u32)> {
        self.carts
            .lock()
            .expect("carts lock")
            .get(&user_id)
            .map(|lines| lines.iter().map(|l| (l.product_id, l.quantity)).collect())
            .unwrap_or_default()
    }

    /// Make card orders come back with a gateway checkout URL.
    pub fn enable_gateway(&self, base: &str) {
        *self.gateway_url.lock().expect("gateway lock") = Some(base.to_string());
    }

    /// Payment status of a recorded order, if it exists.
    pub fn order_payment_status(&self, order_id: i64) -> Option<String> {
        self.orders
            .lock()
            .expect("orders lock")
            .iter()
            .find(|o| o.get("id").and_then(Value::as_i64) == Some(order_id))
            .and_then(|o| o.get("payment_status"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }
}

fn user_for_token(headers: &HeaderMap) -> Option<(i64, &'static str)> {
    let auth = headers.get("Authorization")?.to_str().ok()?;
    match auth.strip_prefix("Bearer ")? {
        CUSTOMER_TOKEN => Some((1, "customer")),
        ADMIN_TOKEN => Some((2, "admin")),
        _ => None,
    }
}

fn product_json(id: i64) -> Option<Value> {
    match id {
        7 => Some(json!({
            "id": 7,
            "category_id": 1,
            "name": "Oak Table",
            "short_description": "Solid oak dining table",
            "long_description": "A solid oak dining table.",
            "base_price": "100.00",
            "base_production_time_days": 5,
            "image_url": "",
            "base_material": "oak",
            "default_width": 180,
            "default_height": 75,
            "default_depth": 90,
            "is_made_to_order": true,
            "options": [{
                "id": 3,
                "product_id": 7,
                "option_type": "color",
                "option_name": "walnut stain",
                "price_modifier_type": "absolute",
                "price_modifier_value": "10.00",
                "production_time_modifier_days": 1
            }]
        })),
        9 => Some(json!({
            "id": 9,
            "category_id": 1,
            "name": "Ash Chair",
            "short_description": "Ash dining chair",
            "long_description": "An ash dining chair.",
            "base_price": "40.00",
            "base_production_time_days": 3,
            "image_url": "",
            "base_material": "ash",
            "default_width": 45,
            "default_height": 90,
            "default_depth": 45,
            "is_made_to_order": false,
            "options": []
        })),
        _ => None,
    }
}

fn cart_json(lines: &[StubCartItem]) -> Value {
    json!({
        "items": lines.iter().map(|l| json!({
            "id": l.id,
            "product_id": l.product_id,
            "quantity": l.quantity,
            "selected_options_json": l.selected_options_json,
        })).collect::<Vec<_>>()
    })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"}))).into_response()
}

/// Build the stub backend router.
#[allow(clippy::too_many_lines)]
fn stub_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                let email = body.get("email").and_then(Value::as_str).unwrap_or("");
                let password = body.get("password").and_then(Value::as_str).unwrap_or("");
                if password != PASSWORD {
                    return unauthorized();
                }
                match email {
                    CUSTOMER_EMAIL => Json(json!({"token": CUSTOMER_TOKEN})).into_response(),
                    ADMIN_EMAIL => Json(json!({"token": ADMIN_TOKEN})).into_response(),
                    _ => unauthorized(),
                }
            }),
        )
        .route(
            "/user/me",
            get(|headers: HeaderMap| async move {
                match user_for_token(&headers) {
                    Some((1, role)) => Json(json!({
                        "id": 1, "role": role, "name": "Iva", "email": CUSTOMER_EMAIL,
                    }))
                    .into_response(),
                    Some((id, role)) => Json(json!({
                        "id": id, "role": role, "name": "Ana", "email": ADMIN_EMAIL,
                    }))
                    .into_response(),
                    None => unauthorized(),
                }
            }),
        )
        .route("/departments", get(|| async { Json(json!([])) }))
        .route(
            "/products/{id}",
            get(|Path(id): Path<i64>| async move {
                product_json(id).map_or_else(
                    || (StatusCode::NOT_FOUND, "no such product").into_response(),
                    |p| Json(p).into_response(),
                )
            }),
        )
        .route(
            "/products/{id}/recommendations",
            get(|| async { Json(json!([])) }),
        )
        .route(
            "/user/cart",
            get({
                let state = state.clone();
                move |headers: HeaderMap| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    let carts = state.carts.lock().expect("carts lock");
                    Json(cart_json(carts.get(&user_id).map_or(&[][..], Vec::as_slice)))
                        .into_response()
                }
            })
            .put({
                let state = state.clone();
                move |headers: HeaderMap, Json(body): Json<Value>| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    let items = body
                        .get("items")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default();
                    let lines: Vec<StubCartItem> = items
                        .iter()
                        .map(|item| StubCartItem {
                            id: state.next_cart_item_id.fetch_add(1, Ordering::SeqCst),
                            product_id: item
                                .get("product_id")
                                .and_then(Value::as_i64)
                                .unwrap_or_default(),
                            quantity: u32::try_from(
                                item.get("quantity").and_then(Value::as_u64).unwrap_or(1),
                            )
                            .unwrap_or(1),
                            selected_options_json: item
                                .get("options")
                                .map(ToString::to_string)
                                .unwrap_or_default(),
                        })
                        .collect();
                    let response = cart_json(&lines);
                    state
                        .carts
                        .lock()
                        .expect("carts lock")
                        .insert(user_id, lines);
                    Json(response).into_response()
                }
            })
            .delete({
                let state = state.clone();
                move |headers: HeaderMap| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    state.carts.lock().expect("carts lock").remove(&user_id);
                    Json(json!({"message": "cleared"})).into_response()
                }
            }),
        )
        .route(
            "/user/cart/items",
            post({
                let state = state.clone();
                move |headers: HeaderMap, Json(body): Json<Value>| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    let product_id = body
                        .get("product_id")
                        .and_then(Value::as_i64)
                        .unwrap_or_default();
                    let quantity = u32::try_from(
                        body.get("quantity").and_then(Value::as_u64).unwrap_or(1),
                    )
                    .unwrap_or(1);
                    let options = body
                        .get("options")
                        .map(ToString::to_string)
                        .unwrap_or_default();

                    let mut carts = state.carts.lock().expect("carts lock");
                    let lines = carts.entry(user_id).or_default();
                    let item = match lines.iter_mut().find(|l| l.product_id == product_id) {
                        Some(existing) => {
                            existing.quantity += quantity;
                            existing.clone()
                        }
                        None => {
                            let item = StubCartItem {
                                id: state.next_cart_item_id.fetch_add(1, Ordering::SeqCst),
                                product_id,
                                quantity,
                                selected_options_json: options,
                            };
                            lines.push(item.clone());
                            item
                        }
                    };
                    Json(json!({
                        "id": item.id,
                        "product_id": item.product_id,
                        "quantity": item.quantity,
                        "selected_options_json": item.selected_options_json,
                    }))
                    .into_response()
                }
            }),
        )
        .route(
            "/user/cart/items/{id}",
            axum::routing::patch({
                let state = state.clone();
                move |headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<Value>| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    let mut carts = state.carts.lock().expect("carts lock");
                    let Some(item) = carts
                        .get_mut(&user_id)
                        .and_then(|lines| lines.iter_mut().find(|l| l.id == id))
                    else {
                        return (StatusCode::NOT_FOUND, "no such item").into_response();
                    };
                    if let Some(quantity) = body.get("quantity").and_then(Value::as_u64) {
                        item.quantity = u32::try_from(quantity).unwrap_or(1);
                    }
                    Json(json!({
                        "id": item.id,
                        "product_id": item.product_id,
                        "quantity": item.quantity,
                        "selected_options_json": item.selected_options_json,
                    }))
                    .into_response()
                }
            })
            .delete({
                let state = state.clone();
                move |headers: HeaderMap, Path(id): Path<i64>| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    if let Some(lines) =
                        state.carts.lock().expect("carts lock").get_mut(&user_id)
                    {
                        lines.retain(|l| l.id != id);
                    }
                    Json(json!({"message": "removed"})).into_response()
                }
            }),
        )
        .route(
            "/orders",
            post({
                let state = state.clone();
                move |headers: HeaderMap, Json(body): Json<Value>| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    let order_id = state.next_order_id.fetch_add(1, Ordering::SeqCst);
                    let method = body
                        .get("payment_method")
                        .and_then(Value::as_str)
                        .unwrap_or("card")
                        .to_string();
                    let items = body
                        .get("items")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default();

                    let order = json!({
                        "id": order_id,
                        "user_id": user_id,
                        "status": "pending",
                        "total_price": "100.00",
                        "estimated_production_time_days": 6,
                        "payment_method": method,
                        "payment_status": "pending",
                        "created_at": "2026-08-01T10:00:00Z",
                        "items": items.iter().enumerate().map(|(i, item)| json!({
                            "id": i64::try_from(i).unwrap_or_default() + 1,
                            "order_id": order_id,
                            "product_id": item.get("product_id").cloned().unwrap_or_default(),
                            "quantity": item.get("quantity").cloned().unwrap_or_default(),
                            "unit_price": "100.00",
                            "line_total": "100.00",
                            "calculated_production_time_days": 6,
                            "selected_options_json": item.get("options").map(ToString::to_string).unwrap_or_default(),
                        })).collect::<Vec<_>>(),
                    });
                    state.orders.lock().expect("orders lock").push(order);

                    let checkout_url = if method == "card" {
                        state
                            .gateway_url
                            .lock()
                            .expect("gateway lock")
                            .as_ref()
                            .map(|base| format!("{base}/session/{order_id}"))
                    } else {
                        None
                    };

                    Json(json!({"order_id": order_id, "checkout_url": checkout_url}))
                        .into_response()
                }
            }),
        )
        .route(
            "/user/orders",
            get({
                let state = state.clone();
                move |headers: HeaderMap| async move {
                    let Some((user_id, _)) = user_for_token(&headers) else {
                        return unauthorized();
                    };
                    let orders: Vec<Value> = state
                        .orders
                        .lock()
                        .expect("orders lock")
                        .iter()
                        .filter(|o| o.get("user_id").and_then(Value::as_i64) == Some(user_id))
                        .cloned()
                        .collect();
                    Json(json!(orders)).into_response()
                }
            }),
        )
        .route(
            "/user/orders/{id}",
            get({
                let state = state.clone();
                move |headers: HeaderMap, Path(id): Path<i64>| async move {
                    if user_for_token(&headers).is_none() {
                        return unauthorized();
                    }
                    state
                        .orders
                        .lock()
                        .expect("orders lock")
                        .iter()
                        .find(|o| o.get("id").and_then(Value::as_i64) == Some(id))
                        .map_or_else(
                            || (StatusCode::NOT_FOUND, "no such order").into_response(),
                            |o| Json(o.clone()).into_response(),
                        )
                }
            }),
        )
        .route(
            "/user/orders/{id}/pay",
            post({
                let state = state.clone();
                move |headers: HeaderMap, Path(id): Path<i64>| async move {
                    if user_for_token(&headers).is_none() {
                        return unauthorized();
                    }
                    let mut orders = state.orders.lock().expect("orders lock");
                    let Some(order) = orders
                        .iter_mut()
                        .find(|o| o.get("id").and_then(Value::as_i64) == Some(id))
                    else {
                        return (StatusCode::NOT_FOUND, "no such order").into_response();
                    };
                    order["payment_status"] = json!("paid");
                    order["status"] = json!("processing");
                    Json(json!({"payment_status": "paid"})).into_response()
                }
            }),
        )
}

/// Everything a test needs: the driven storefront, the stub backend's
/// state handle, and a cookie-holding client with redirects disabled.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    pub stub: Arc<StubState>,
}

impl TestContext {
    /// Start the stub backend and the storefront, both on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to bind; tests cannot proceed without
    /// both.
    pub async fn new() -> Self {
        let stub = Arc::new(StubState::new());

        let backend_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let backend_addr = backend_listener.local_addr().expect("stub addr");
        let backend_router = stub_router(stub.clone());
        tokio::spawn(async move {
            axum::serve(backend_listener, backend_router)
                .await
                .expect("stub backend crashed");
        });

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("ip"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            api_base_url: format!("http://{backend_addr}"),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let app = arbor_storefront::app(AppState::new(config));

        let storefront_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let storefront_addr = storefront_listener.local_addr().expect("storefront addr");
        tokio::spawn(async move {
            axum::serve(storefront_listener, app)
                .await
                .expect("storefront crashed");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build client");

        Self {
            client,
            storefront_url: format!("http://{storefront_addr}"),
            stub,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Sign in through the real login form.
    ///
    /// # Panics
    ///
    /// Panics if the login request cannot be sent.
    pub async fn login(&self, email: &str, next: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", PASSWORD), ("next", next)])
            .send()
            .await
            .expect("send login")
    }

    /// Add a product to the cart through the real form endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn add_to_cart(&self, product_id: i64, quantity: u32) -> reqwest::Response {
        self.client
            .post(self.url("/cart/add"))
            .form(&[
                ("product_id", product_id.to_string()),
                ("quantity", quantity.to_string()),
            ])
            .send()
            .await
            .expect("send add to cart")
    }
}

/// Location header of a redirect response.
///
/// # Panics
///
/// Panics if the response has no Location header.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .expect("location header")
        .to_str()
        .expect("location header utf-8")
        .to_string()
}
