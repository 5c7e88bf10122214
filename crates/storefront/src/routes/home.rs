//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use arbor_core::Department;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

use super::PageCtx;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageCtx,
    pub departments: Vec<Department>,
}

/// Display the home page with the department list.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    // A failed load renders an empty list rather than an error page.
    let departments = match state.shop().departments().await {
        Ok(departments) => departments,
        Err(e) => {
            tracing::warn!("failed to load departments: {e}");
            Vec::new()
        }
    };

    HomeTemplate {
        ctx: PageCtx::build(&session, user).await,
        departments,
    }
}
