//! Session-stored admin identity.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use arbor_core::{User, UserId};

/// Session-stored admin identity plus the backend bearer token.
///
/// Only users whose backend role is `admin` ever get stored here; the
/// login handler checks the role before writing the session.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "CurrentAdminRepr", into = "CurrentAdminRepr")]
pub struct CurrentAdmin {
    pub id: UserId,
    pub name: String,
    pub email: String,
    token: SecretString,
}

impl CurrentAdmin {
    /// Build the session identity from a backend user and its token.
    #[must_use]
    pub fn new(user: &User, token: SecretString) -> Self {
        Self {
            id: user.id,
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
}

impl std::fmt::Debug for CurrentAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentAdmin")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Plain mirror of [`CurrentAdmin`] used only for session (de)serialization.
#[derive(Serialize, Deserialize)]
struct CurrentAdminRepr {
    id: UserId,
    name: String,
    email: String,
    token: String,
}

impl From<CurrentAdminRepr> for CurrentAdmin {
    fn from(repr: CurrentAdminRepr) -> Self {
        Self {
            id: repr.id,
            name: repr.name,
            email: repr.email,
            token: SecretString::from(repr.token),
        }
    }
}

impl From<CurrentAdmin> for CurrentAdminRepr {
    fn from(admin: CurrentAdmin) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            token: admin.token.expose_secret().to_string(),
        }
    }
}

/// Session keys for the admin panel.
pub mod session_keys {
    /// Key for the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
