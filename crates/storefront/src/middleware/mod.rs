//! Storefront middleware: sessions, auth extractors, and the route policy.

pub mod auth;
pub mod policy;
pub mod session;

pub use auth::{OptionalUser, RequireUser, clear_current_user, set_current_user};
pub use policy::{Capability, enforce_route_policy};
pub use session::create_session_layer;
