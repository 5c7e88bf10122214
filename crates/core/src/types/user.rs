//! User wire model and roles.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Role attached to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as returned by the backend's "who am I" endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl User {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let role: Role = serde_json::from_str("\"admin\"").expect("parse role");
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::Customer.to_string(), "customer");
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"role":"customer","name":"Iva","email":"iva@example.com"}"#,
        )
        .expect("parse user");
        assert!(!user.is_admin());
        assert!(user.address.is_empty());
    }
}
