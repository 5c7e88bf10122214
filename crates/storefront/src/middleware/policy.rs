//! Declarative route access policy.
//!
//! Every guarded route prefix is annotated with the capabilities a request
//! must satisfy, and one middleware evaluates the table centrally before
//! the handler runs. Deny outcomes:
//!
//! - `Authenticated` fails: redirect to the login page carrying the
//!   originating path in `?next=` for post-login return
//! - `Anonymous` fails (already logged in): redirect home
//! - `Role`/`NotRole` fail: redirect home

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use arbor_core::Role;

use crate::models::{CurrentUser, session_keys};

/// What a route requires of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A signed-in user of any role.
    Authenticated,
    /// No signed-in user (login/register pages).
    Anonymous,
    /// A signed-in user with this role.
    Role(Role),
    /// Any session except a signed-in user with this role.
    NotRole(Role),
}

/// The storefront's route policy table.
///
/// A path matches an entry when it equals the prefix or continues it at a
/// `/` boundary; the first matching entry wins. Routes without an entry
/// are public.
const POLICIES: &[(&str, &[Capability])] = &[
    ("/orders", &[Capability::Authenticated, Capability::NotRole(Role::Admin)]),
    ("/checkout", &[Capability::Authenticated]),
    ("/login", &[Capability::Anonymous]),
    ("/register", &[Capability::Anonymous]),
];

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

/// Look up the capabilities required for a path.
#[must_use]
pub fn capabilities_for(path: &str) -> &'static [Capability] {
    POLICIES
        .iter()
        .find(|(prefix, _)| matches_prefix(path, prefix))
        .map_or(&[], |(_, caps)| caps)
}

enum Verdict {
    Allow,
    LoginWithReturn,
    Home,
}

fn evaluate(capabilities: &[Capability], user: Option<&CurrentUser>) -> Verdict {
    for capability in capabilities {
        match capability {
            Capability::Authenticated => {
                if user.is_none() {
                    return Verdict::LoginWithReturn;
                }
            }
            Capability::Anonymous => {
                if user.is_some() {
                    return Verdict::Home;
                }
            }
            Capability::Role(role) => {
                if user.is_none_or(|u| u.role != *role) {
                    return Verdict::Home;
                }
            }
            Capability::NotRole(role) => {
                if user.is_some_and(|u| u.role == *role) {
                    return Verdict::Home;
                }
            }
        }
    }
    Verdict::Allow
}

/// Evaluate the policy table for the incoming request.
pub async fn enforce_route_policy(session: Session, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let capabilities = capabilities_for(&path);

    if capabilities.is_empty() {
        return next.run(request).await;
    }

    let user: Option<CurrentUser> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    match evaluate(capabilities, user.as_ref()) {
        Verdict::Allow => next.run(request).await,
        Verdict::LoginWithReturn => {
            let next_path = request
                .uri()
                .path_and_query()
                .map_or_else(|| path.clone(), ToString::to_string);
            let target = format!("/login?next={}", urlencoding::encode(&next_path));
            Redirect::to(&target).into_response()
        }
        Verdict::Home => Redirect::to("/").into_response(),
    }
}

/// Validate a post-login return target.
///
/// Only local absolute paths are honored, so a crafted `next` cannot send
/// the browser off-site.
#[must_use]
pub fn safe_return_target(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{User, UserId};
    use secrecy::SecretString;

    fn user(role: Role) -> CurrentUser {
        CurrentUser::new(
            &User {
                id: UserId::new(1),
                role,
                name: "Iva".to_string(),
                email: "iva@example.com".to_string(),
                address: String::new(),
                phone: String::new(),
            },
            SecretString::from("token"),
        )
    }

    #[test]
    fn test_prefix_matching() {
        assert!(matches_prefix("/orders", "/orders"));
        assert!(matches_prefix("/orders/3", "/orders"));
        assert!(!matches_prefix("/ordersx", "/orders"));
        assert!(!matches_prefix("/", "/orders"));
    }

    #[test]
    fn test_public_routes_have_no_capabilities() {
        assert!(capabilities_for("/").is_empty());
        assert!(capabilities_for("/catalog").is_empty());
        assert!(capabilities_for("/cart").is_empty());
    }

    #[test]
    fn test_orders_requires_auth() {
        let caps = capabilities_for("/orders");
        assert!(matches!(evaluate(caps, None), Verdict::LoginWithReturn));
    }

    #[test]
    fn test_orders_forbids_admin() {
        let caps = capabilities_for("/orders");
        let admin = user(Role::Admin);
        assert!(matches!(evaluate(caps, Some(&admin)), Verdict::Home));

        let customer = user(Role::Customer);
        assert!(matches!(evaluate(caps, Some(&customer)), Verdict::Allow));
    }

    #[test]
    fn test_role_capability() {
        let caps = &[Capability::Role(Role::Admin)];
        let admin = user(Role::Admin);
        let customer = user(Role::Customer);
        assert!(matches!(evaluate(caps, Some(&admin)), Verdict::Allow));
        assert!(matches!(evaluate(caps, Some(&customer)), Verdict::Home));
        assert!(matches!(evaluate(caps, None), Verdict::Home));
    }

    #[test]
    fn test_login_forbids_authenticated() {
        let caps = capabilities_for("/login");
        let customer = user(Role::Customer);
        assert!(matches!(evaluate(caps, Some(&customer)), Verdict::Home));
        assert!(matches!(evaluate(caps, None), Verdict::Allow));
    }

    #[test]
    fn test_safe_return_target() {
        assert_eq!(safe_return_target(Some("/orders")), "/orders");
        assert_eq!(safe_return_target(Some("//evil.example")), "/");
        assert_eq!(safe_return_target(Some("https://evil.example")), "/");
        assert_eq!(safe_return_target(None), "/");
    }
}
