//! Admin login and logout.

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

use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = query.error.map(|kind| match kind.as_str() {
        "forbidden" => "This account has no admin access".to_string(),
        _ => "Invalid email or password".to_string(),
    });

    LoginTemplate { error }
}

/// Handle login form submission.
///
/// Only accounts whose backend role is `admin` get a session; everyone
/// else is bounced back with an error.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.api().login(&form.email, &form.password).await {
        Ok(response) => response.token,
        Err(e) => {
            tracing::warn!("admin login failed: {e}");
            return Redirect::to("/login?error=credentials").into_response();
        }
    };

    match state.api().me(&token).await {
        Ok(user) if user.is_admin() => {
            let admin = CurrentAdmin::new(&user, SecretString::from(token));
            if let Err(e) = set_current_admin(&session, &admin).await {
                tracing::error!("failed to set session: {e}");
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Ok(_) => Redirect::to("/login?error=forbidden").into_response(),
        Err(e) => {
            tracing::warn!("failed to fetch identity after login: {e}");
            Redirect::to("/login?error=identity").into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("failed to clear session admin: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::error!("failed to flush session: {e}");
    }

    Redirect::to("/login").into_response()
}
