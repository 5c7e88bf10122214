//! Admin middleware: sessions and the admin-role gate.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, require_admin, set_current_admin};
pub use session::create_session_layer;
