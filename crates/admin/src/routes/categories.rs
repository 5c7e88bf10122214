//! Category CRUD screens.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use arbor_core::{Category, CategoryId, Department, DepartmentId};

use crate::backend::types::CategoryPayload;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Category form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub department_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl From<CategoryForm> for CategoryPayload {
    fn from(form: CategoryForm) -> Self {
        Self {
            department_id: DepartmentId::new(form.department_id),
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
        }
    }
}

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub categories: Vec<Category>,
    pub departments: Vec<Department>,
}

/// Category edit template.
#[derive(Template, WebTemplate)]
#[template(path = "category_edit.html")]
pub struct CategoryEditTemplate {
    pub category: Category,
    pub departments: Vec<Department>,
}

/// List categories with the create form.
#[instrument(skip(state, admin))]
pub async fn index(State(state): State<AppState>, admin: RequireAdmin) -> impl IntoResponse {
    let token = admin.0.token();
    let categories = state.api().categories(token).await.unwrap_or_else(|e| {
        tracing::warn!("failed to load categories: {e}");
        Vec::new()
    });
    let departments = state.api().departments(token).await.unwrap_or_else(|e| {
        tracing::warn!("failed to load departments: {e}");
        Vec::new()
    });

    CategoriesTemplate {
        categories,
        departments,
    }
}

/// Create a category.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    state
        .api()
        .create_category(admin.0.token(), &form.into())
        .await?;
    Ok(Redirect::to("/categories").into_response())
}

/// Display the edit form for a category.
#[instrument(skip(state, admin))]
pub async fn edit_page(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    let token = admin.0.token();
    let id = CategoryId::new(id);
    let category = state
        .api()
        .categories(token)
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| crate::error::AppError::NotFound(format!("category {id}")))?;
    let departments = state.api().departments(token).await.unwrap_or_default();

    Ok(CategoryEditTemplate {
        category,
        departments,
    }
    .into_response())
}

/// Update a category.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    state
        .api()
        .update_category(admin.0.token(), CategoryId::new(id), &form.into())
        .await?;
    Ok(Redirect::to("/categories").into_response())
}

/// Delete a category.
#[instrument(skip(state, admin))]
pub async fn delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    state
        .api()
        .delete_category(admin.0.token(), CategoryId::new(id))
        .await?;
    Ok(Redirect::to("/categories").into_response())
}
