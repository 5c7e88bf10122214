//! Session-stored types.
//!
//! The session is this layer's durable client state: the bearer token, the
//! guest cart lines, and the active language all live here.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use arbor_core::{Role, User, UserId};

/// Session-stored user identity plus the backend bearer token.
///
/// The token is wrapped in [`SecretString`] so it never shows up in logs;
/// serialization for session storage goes through a plain mirror struct.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "CurrentUserRepr", into = "CurrentUserRepr")]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
    token: SecretString,
}

impl CurrentUser {
    /// Build the session identity from a backend user and its token.
    #[must_use]
    pub fn new(user: &User, token: SecretString) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name.clone(),
            email: user.email.clone(),
            token,
        }
    }

    /// The bearer token for backend calls.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Plain mirror of [`CurrentUser`] used only for session (de)serialization.
#[derive(Serialize, Deserialize)]
struct CurrentUserRepr {
    id: UserId,
    role: Role,
    name: String,
    email: String,
    token: String,
}

impl From<CurrentUserRepr> for CurrentUser {
    fn from(repr: CurrentUserRepr) -> Self {
        Self {
            id: repr.id,
            role: repr.role,
            name: repr.name,
            email: repr.email,
            token: SecretString::from(repr.token),
        }
    }
}

impl From<CurrentUser> for CurrentUserRepr {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name,
            email: user.email,
            token: user.token.expose_secret().to_string(),
        }
    }
}

/// Session keys for persisted client state.
pub mod session_keys {
    /// Key for the current logged-in user (identity + bearer token).
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the guest cart lines, kept only while logged out.
    pub const GUEST_CART: &str = "guest_cart";

    /// Key for the active language code.
    pub const LANG: &str = "lang";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser::new(
            &User {
                id: UserId::new(1),
                role: Role::Customer,
                name: "Iva".to_string(),
                email: "iva@example.com".to_string(),
                address: String::new(),
                phone: String::new(),
            },
            SecretString::from("jwt-token"),
        )
    }

    #[test]
    fn test_serde_roundtrip_keeps_token() {
        let json = serde_json::to_string(&user()).expect("serialize");
        let back: CurrentUser = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.token(), "jwt-token");
        assert_eq!(back.email, "iva@example.com");
    }

    #[test]
    fn test_debug_redacts_token() {
        let output = format!("{:?}", user());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("jwt-token"));
    }
}
