//! Cart orchestration over the session and the backend.
//!
//! Two modes, switched by whether a user is signed in:
//!
//! - **Guest**: lines live only in the session, mutated in place with the
//!   product-id keying from `arbor_core::cart`.
//! - **Authenticated**: the server cart is authoritative. Every mutation
//!   writes to the backend and then re-reads the full cart, so the state
//!   handed back always mirrors the server.
//!
//! The login-time merge follows the reconciliation contract: an empty guest
//! cart adopts the server cart without writing; otherwise quantities are
//! summed per (product, option-set) key, the merged set is written back as
//! the new authoritative cart, and the guest copy is dropped.

use tower_sessions::Session;

use arbor_core::ProductId;
use arbor_core::cart::{self, CartLine};

use crate::backend::types::UpdateCartItemRequest;
use crate::backend::{ApiError, ShopClient};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Cart operations for one request.
pub struct CartService<'a> {
    shop: &'a ShopClient,
    session: &'a Session,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub fn new(state: &'a AppState, session: &'a Session) -> Self {
        Self {
            shop: state.shop(),
            session,
        }
    }

    // =========================================================================
    // Session (guest) cart
    // =========================================================================

    /// Read the guest cart from the session.
    pub async fn guest_lines(&self) -> Vec<CartLine> {
        self.session
            .get::<Vec<CartLine>>(session_keys::GUEST_CART)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn save_guest_lines(&self, lines: &[CartLine]) {
        if let Err(e) = self.session.insert(session_keys::GUEST_CART, lines).await {
            tracing::error!("failed to persist guest cart: {e}");
        }
    }

    async fn clear_guest_lines(&self) {
        if let Err(e) = self
            .session
            .remove::<Vec<CartLine>>(session_keys::GUEST_CART)
            .await
        {
            tracing::error!("failed to clear guest cart: {e}");
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart lines for this session.
    ///
    /// Signed in: the server cart; a failed fetch logs and renders empty,
    /// matching the "failed loads leave lists empty" policy.
    pub async fn lines(&self, user: Option<&CurrentUser>) -> Vec<CartLine> {
        match user {
            Some(user) => match self.shop.get_cart(user.token()).await {
                Ok(cart) => cart.lines(),
                Err(e) => {
                    tracing::warn!("failed to fetch server cart: {e}");
                    Vec::new()
                }
            },
            None => self.guest_lines().await,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a line.
    ///
    /// Guest adds match an existing line by product id only, incrementing
    /// its quantity on a repeat add of the same product.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend write or the follow-up re-read fails.
    pub async fn add(
        &self,
        user: Option<&CurrentUser>,
        line: CartLine,
    ) -> Result<Vec<CartLine>, ApiError> {
        match user {
            Some(user) => {
                self.shop.add_cart_item(user.token(), &line).await?;
                Ok(self.shop.get_cart(user.token()).await?.lines())
            }
            None => {
                let mut lines = self.guest_lines().await;
                cart::add_line(&mut lines, line);
                self.save_guest_lines(&lines).await;
                Ok(lines)
            }
        }
    }

    /// Remove the line for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend write or the follow-up re-read fails.
    pub async fn remove(
        &self,
        user: Option<&CurrentUser>,
        product_id: ProductId,
    ) -> Result<Vec<CartLine>, ApiError> {
        match user {
            Some(user) => {
                let cart = self.shop.get_cart(user.token()).await?;
                if let Some(item) = cart.item_for_product(product_id) {
                    self.shop.remove_cart_item(user.token(), item.id).await?;
                }
                Ok(self.shop.get_cart(user.token()).await?.lines())
            }
            None => {
                let mut lines = self.guest_lines().await;
                cart::remove_line(&mut lines, product_id);
                self.save_guest_lines(&lines).await;
                Ok(lines)
            }
        }
    }

    /// Increment the quantity of a product's line.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend write or the follow-up re-read fails.
    pub async fn increment(
        &self,
        user: Option<&CurrentUser>,
        product_id: ProductId,
    ) -> Result<Vec<CartLine>, ApiError> {
        match user {
            Some(user) => {
                let cart = self.shop.get_cart(user.token()).await?;
                if let Some(item) = cart.item_for_product(product_id) {
                    let request = UpdateCartItemRequest {
                        quantity: item.quantity + 1,
                        options: item.to_line().options,
                    };
                    self.shop
                        .update_cart_item(user.token(), item.id, &request)
                        .await?;
                }
                Ok(self.shop.get_cart(user.token()).await?.lines())
            }
            None => {
                let mut lines = self.guest_lines().await;
                cart::increment_line(&mut lines, product_id);
                self.save_guest_lines(&lines).await;
                Ok(lines)
            }
        }
    }

    /// Decrement the quantity of a product's line; a decrement at quantity
    /// one removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend write or the follow-up re-read fails.
    pub async fn decrement(
        &self,
        user: Option<&CurrentUser>,
        product_id: ProductId,
    ) -> Result<Vec<CartLine>, ApiError> {
        match user {
            Some(user) => {
                let cart = self.shop.get_cart(user.token()).await?;
                if let Some(item) = cart.item_for_product(product_id) {
                    if item.quantity > 1 {
                        let request = UpdateCartItemRequest {
                            quantity: item.quantity - 1,
                            options: item.to_line().options,
                        };
                        self.shop
                            .update_cart_item(user.token(), item.id, &request)
                            .await?;
                    } else {
                        self.shop.remove_cart_item(user.token(), item.id).await?;
                    }
                }
                Ok(self.shop.get_cart(user.token()).await?.lines())
            }
            None => {
                let mut lines = self.guest_lines().await;
                cart::decrement_line(&mut lines, product_id);
                self.save_guest_lines(&lines).await;
                Ok(lines)
            }
        }
    }

    /// Clear the cart for this session (both sides when signed in).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub async fn clear(&self, user: Option<&CurrentUser>) -> Result<(), ApiError> {
        if let Some(user) = user {
            self.shop.clear_cart(user.token()).await?;
        }
        self.clear_guest_lines().await;
        Ok(())
    }

    // =========================================================================
    // Login reconciliation
    // =========================================================================

    /// Merge the guest cart into the server cart after sign-in.
    ///
    /// An empty guest cart adopts the server cart unchanged (no write).
    /// Otherwise quantities are summed per merge key, the merged set is
    /// written back with `PUT /user/cart`, and the result is re-read as the
    /// new authoritative state. A failed server-cart fetch leaves the guest
    /// cart untouched and is logged rather than silently swallowed.
    pub async fn merge_on_login(&self, user: &CurrentUser) -> Vec<CartLine> {
        let guest = self.guest_lines().await;

        if guest.is_empty() {
            return match self.shop.get_cart(user.token()).await {
                Ok(server) => server.lines(),
                Err(e) => {
                    tracing::warn!("cart merge skipped, server cart fetch failed: {e}");
                    Vec::new()
                }
            };
        }

        let server = match self.shop.get_cart(user.token()).await {
            Ok(server) => server.lines(),
            Err(e) => {
                // Merge deferred: the guest cart stays in the session and a
                // later sign-in attempt can reconcile it.
                tracing::warn!("cart merge deferred, server cart fetch failed: {e}");
                return guest;
            }
        };

        let merged = cart::merge_carts(&server, &guest);

        let lines = match self.shop.replace_cart(user.token(), &merged).await {
            Ok(_) => match self.shop.get_cart(user.token()).await {
                Ok(server) => server.lines(),
                Err(e) => {
                    tracing::warn!("cart re-read after merge failed: {e}");
                    merged
                }
            },
            Err(e) => {
                tracing::warn!("cart merge deferred, replace failed: {e}");
                return guest;
            }
        };

        self.clear_guest_lines().await;
        lines
    }
}
