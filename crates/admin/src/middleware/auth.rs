//! Admin authentication: the role gate and the session extractor.
//!
//! The whole panel sits behind one rule - every route except the login
//! page requires a signed-in admin - so the gate is a single middleware
//! rather than per-page wrappers.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Paths reachable without an admin session.
const OPEN_PREFIXES: &[&str] = &["/login", "/health", "/static"];

fn is_open(path: &str) -> bool {
    OPEN_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
    })
}

/// Gate every non-open route behind an admin session.
pub async fn require_admin(session: Session, request: Request, next: Next) -> Response {
    if is_open(request.uri().path()) {
        return next.run(request).await;
    }

    let admin: Option<CurrentAdmin> = session
        .get(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten();

    if admin.is_none() {
        return Redirect::to("/login").into_response();
    }

    next.run(request).await
}

/// Extractor handing the signed-in admin to handlers.
pub struct RequireAdmin(pub CurrentAdmin);

/// Redirect to login when no admin session exists.
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(AdminRejection)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection)?;

        Ok(Self(admin))
    }
}

/// Store the signed-in admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Clear the signed-in admin from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_paths() {
        assert!(is_open("/login"));
        assert!(is_open("/health"));
        assert!(is_open("/static/admin.css"));
        assert!(!is_open("/"));
        assert!(!is_open("/orders"));
        assert!(!is_open("/loginx"));
    }
}
