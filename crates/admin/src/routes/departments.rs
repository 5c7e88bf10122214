//! Department CRUD screens.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use arbor_core::{Department, DepartmentId};

use crate::backend::types::DepartmentPayload;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Department form data.
#[derive(Debug, Deserialize)]
pub struct DepartmentForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl From<DepartmentForm> for DepartmentPayload {
    fn from(form: DepartmentForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
        }
    }
}

/// Department list template.
#[derive(Template, WebTemplate)]
#[template(path = "departments.html")]
pub struct DepartmentsTemplate {
    pub departments: Vec<Department>,
}

/// Department edit template.
#[derive(Template, WebTemplate)]
#[template(path = "department_edit.html")]
pub struct DepartmentEditTemplate {
    pub department: Department,
}

/// List departments with the create form.
#[instrument(skip(state, admin))]
pub async fn index(State(state): State<AppState>, admin: RequireAdmin) -> impl IntoResponse {
    let departments = state
        .api()
        .departments(admin.0.token())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("failed to load departments: {e}");
            Vec::new()
        });

    DepartmentsTemplate { departments }
}

/// Create a department.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Form(form): Form<DepartmentForm>,
) -> Result<Response> {
    state
        .api()
        .create_department(admin.0.token(), &form.into())
        .await?;
    Ok(Redirect::to("/departments").into_response())
}

/// Display the edit form for a department.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    let id = DepartmentId::new(id);
    let department = state
        .api()
        .departments(admin.0.token())
        .await?
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| crate::error::AppError::NotFound(format!("department {id}")))?;

    Ok(DepartmentEditTemplate { department }.into_response())
}

/// Update a department.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<DepartmentForm>,
) -> Result<Response> {
    state
        .api()
        .update_department(admin.0.token(), DepartmentId::new(id), &form.into())
        .await?;
    Ok(Redirect::to("/departments").into_response())
}

/// Delete a department.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state
        .api()
        .delete_department(admin.0.token(), DepartmentId::new(id))
        .await?;
    Ok(Redirect::to("/departments").into_response())
}
