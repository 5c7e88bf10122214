//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (departments)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /catalog                - Department/category drill-down + search
//! GET  /products/{id}          - Product detail with options
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add a line (product page form)
//! POST /cart/remove            - Remove a product's line
//! POST /cart/increment         - Quantity +1
//! POST /cart/decrement         - Quantity -1 (removes the line at 1)
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Order details form
//! POST /checkout               - Create the order
//! GET  /checkout/pay/{id}      - Card payment form (awaiting payment)
//! POST /checkout/pay/{id}      - Submit card payment
//! GET  /checkout/success       - Gateway return; clears the cart
//! GET  /checkout/cancel        - Gateway cancel return
//!
//! # Auth
//! GET  /login                  - Login page (anonymous only)
//! POST /login                  - Login action; merges the guest cart
//! GET  /register               - Register page (anonymous only)
//! POST /register               - Register action
//! POST /logout                 - Logout action
//!
//! # Orders (requires auth, forbidden to admins)
//! GET  /orders                 - Order history, expandable detail
//!
//! # Locale
//! POST /lang                   - Switch the active language
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod home;
pub mod lang;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use arbor_core::i18n::Lang;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Per-page context shared by every template: the active language and the
/// current user (for the nav).
pub struct PageCtx {
    pub lang: Lang,
    pub user: Option<CurrentUser>,
}

impl PageCtx {
    /// Build the context from the session.
    pub async fn build(session: &Session, user: Option<CurrentUser>) -> Self {
        let lang = session
            .get::<String>(session_keys::LANG)
            .await
            .ok()
            .flatten()
            .map_or_else(Lang::default, |code| Lang::from_code(&code));

        Self { lang, user }
    }

    /// Translate a key in the active language.
    #[must_use]
    pub fn t<'k>(&self, key: &'k str) -> &'k str {
        self.lang.t(key)
    }

    #[must_use]
    pub const fn logged_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/pay/{id}", get(checkout::pay_page).post(checkout::pay))
        .route("/success", get(checkout::success))
        .route("/cancel", get(checkout::cancel))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/catalog", get(catalog::index))
        .route("/products/{id}", get(products::show))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Orders
        .route("/orders", get(orders::index))
        // Auth
        .merge(auth_routes())
        // Locale
        .route("/lang", post(lang::set))
}
