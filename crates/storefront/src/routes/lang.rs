//! Language switcher.

use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::i18n::Lang;

use crate::middleware::policy::safe_return_target;
use crate::models::session_keys;

/// Language switch form data.
#[derive(Debug, Deserialize)]
pub struct LangForm {
    pub lang: String,
    pub next: Option<String>,
}

/// Persist the active language in the session and return to the page the
/// switch was made from.
#[instrument(skip(session))]
pub async fn set(session: Session, Form(form): Form<LangForm>) -> Response {
    let lang = Lang::from_code(&form.lang);
    if let Err(e) = session.insert(session_keys::LANG, lang.code()).await {
        tracing::error!("failed to persist language: {e}");
    }

    Redirect::to(safe_return_target(form.next.as_deref())).into_response()
}
