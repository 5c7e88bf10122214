//! Authentication route handlers.
//!
//! Login and registration exchange credentials with the commerce backend
//! for a bearer token, then fetch the identity behind it and store both in
//! the session. Signing in reconciles the guest cart with the server cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::policy::safe_return_target;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::CartService;
use crate::state::AppState;

use super::PageCtx;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// Query parameters for error display and post-login return.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub ctx: PageCtx,
    pub error: Option<String>,
    pub next: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub ctx: PageCtx,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip(session))]
pub async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let ctx = PageCtx::build(&session, None).await;
    let error = query.error.map(|_| ctx.t("login.error").to_string());

    LoginTemplate {
        ctx,
        error,
        next: safe_return_target(query.next.as_deref()).to_string(),
    }
}

/// Handle login form submission.
///
/// On success the guest cart is merged into the server cart and the
/// browser returns to the page that originally required authentication.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_return_target(form.next.as_deref()).to_string();

    let token = match state.shop().login(&form.email, &form.password).await {
        Ok(response) => response.token,
        Err(e) => {
            tracing::warn!("login failed: {e}");
            let target = format!(
                "/login?error=credentials&next={}",
                urlencoding::encode(&next)
            );
            return Redirect::to(&target).into_response();
        }
    };

    match state.shop().me(&token).await {
        Ok(user) => {
            let current = CurrentUser::new(&user, SecretString::from(token));

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            set_sentry_user(&current.id, Some(&current.email));

            let service = CartService::new(&state, &session);
            service.merge_on_login(&current).await;

            Redirect::to(&next).into_response()
        }
        Err(e) => {
            tracing::warn!("failed to fetch identity after login: {e}");
            Redirect::to("/login?error=identity").into_response()
        }
    }
}

/// Display the registration page.
#[instrument(skip(session))]
pub async fn register_page(
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let ctx = PageCtx::build(&session, None).await;
    let error = query.error.map(|_| ctx.t("register.error").to_string());

    RegisterTemplate { ctx, error }
}

/// Handle registration form submission.
///
/// The backend hands back a token right away, so a successful registration
/// signs the user in and runs the same cart merge as login.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password.len() < 8 {
        return Redirect::to("/register?error=password_too_short").into_response();
    }
    if form.name.trim().is_empty() || !form.email.contains('@') {
        return Redirect::to("/register?error=invalid").into_response();
    }

    let request = crate::backend::types::RegisterRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
        address: form.address.trim().to_string(),
        phone: form.phone.trim().to_string(),
    };

    let token = match state.shop().register(&request).await {
        Ok(response) => response.token,
        Err(e) => {
            tracing::warn!("registration failed: {e}");
            return Redirect::to("/register?error=failed").into_response();
        }
    };

    match state.shop().me(&token).await {
        Ok(user) => {
            let current = CurrentUser::new(&user, SecretString::from(token));

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            set_sentry_user(&current.id, Some(&current.email));

            let service = CartService::new(&state, &session);
            service.merge_on_login(&current).await;

            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("failed to fetch identity after registration: {e}");
            Redirect::to("/login").into_response()
        }
    }
}

/// Handle logout.
///
/// Clears the session, which erases the bearer token and the guest cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("failed to clear session user: {e}");
    }
    clear_sentry_user();

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}
