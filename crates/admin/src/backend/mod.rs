//! Commerce backend admin API client.
//!
//! Talks to the backend's `/admin` surface plus the shared auth endpoints.
//! Unlike the storefront client nothing is cached here: an operator editing
//! the catalog always sees live data.

pub mod types;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use arbor_core::{
    Category, CategoryId, Department, DepartmentId, OptionId, Order, OrderId, OrderStatus,
    Product, ProductId, ProductOption, User,
};

use types::{
    CategoryPayload, DepartmentPayload, LoginRequest, OptionPayload, ProductPayload,
    TokenResponse, UpdateOrderStatusRequest, UploadResponse,
};

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The stored bearer token was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend rejected the request with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },
}

/// Client for the backend's admin surface.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new admin client for the given API base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let request = match token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ApiError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(
                body.chars().take(200).collect::<String>(),
            ));
        }
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        self.execute(self.inner.client.get(self.url(path)), Some(token))
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.post(self.url(path)).json(body), token)
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<T, ApiError> {
        self.execute(
            self.inner.client.put(self.url(path)).json(body),
            Some(token),
        )
        .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        self.execute(self.inner.client.delete(self.url(path)), Some(token))
            .await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/auth/login", &request, None).await
    }

    /// Fetch the identity behind a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is stale or the request fails.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.get("/user/me", token).await
    }

    // =========================================================================
    // Departments
    // =========================================================================

    /// List all departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn departments(&self, token: &str) -> Result<Vec<Department>, ApiError> {
        self.get("/admin/departments", token).await
    }

    /// Create a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_department(
        &self,
        token: &str,
        payload: &DepartmentPayload,
    ) -> Result<Department, ApiError> {
        self.post("/admin/departments", payload, Some(token)).await
    }

    /// Update a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_department(
        &self,
        token: &str,
        id: DepartmentId,
        payload: &DepartmentPayload,
    ) -> Result<Department, ApiError> {
        self.put(&format!("/admin/departments/{id}"), payload, token)
            .await
    }

    /// Delete a department.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_department(
        &self,
        token: &str,
        id: DepartmentId,
    ) -> Result<types::Ack, ApiError> {
        self.delete(&format!("/admin/departments/{id}"), token).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn categories(&self, token: &str) -> Result<Vec<Category>, ApiError> {
        self.get("/admin/categories", token).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_category(
        &self,
        token: &str,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.post("/admin/categories", payload, Some(token)).await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_category(
        &self,
        token: &str,
        id: CategoryId,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.put(&format!("/admin/categories/{id}"), payload, token)
            .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_category(
        &self,
        token: &str,
        id: CategoryId,
    ) -> Result<types::Ack, ApiError> {
        self.delete(&format!("/admin/categories/{id}"), token).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn products(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        self.get("/admin/products", token).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_product(
        &self,
        token: &str,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        self.post("/admin/products", payload, Some(token)).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        self.put(&format!("/admin/products/{id}"), payload, token)
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_product(&self, token: &str, id: ProductId) -> Result<types::Ack, ApiError> {
        self.delete(&format!("/admin/products/{id}"), token).await
    }

    // =========================================================================
    // Product options
    // =========================================================================

    /// List all product options.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn product_options(&self, token: &str) -> Result<Vec<ProductOption>, ApiError> {
        self.get("/admin/product_options", token).await
    }

    /// Create a product option.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_product_option(
        &self,
        token: &str,
        payload: &OptionPayload,
    ) -> Result<ProductOption, ApiError> {
        self.post("/admin/product_options", payload, Some(token))
            .await
    }

    /// Update a product option.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(id = %id))]
    pub async fn update_product_option(
        &self,
        token: &str,
        id: OptionId,
        payload: &OptionPayload,
    ) -> Result<ProductOption, ApiError> {
        self.put(&format!("/admin/product_options/{id}"), payload, token)
            .await
    }

    /// Delete a product option.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_product_option(
        &self,
        token: &str,
        id: OptionId,
    ) -> Result<types::Ack, ApiError> {
        self.delete(&format!("/admin/product_options/{id}"), token)
            .await
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Upload an image; the backend stores it and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, token, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload_image(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        self.execute(
            self.inner
                .client
                .post(self.url("/admin/upload"))
                .multipart(form),
            Some(token),
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        self.get("/admin/orders", token).await
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &str,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let request = UpdateOrderStatusRequest { status };
        self.execute(
            self.inner
                .client
                .patch(self.url(&format!("/admin/orders/{id}/status")))
                .json(&request),
            Some(token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AdminClient::new("http://localhost:8080/api/");
        assert_eq!(
            client.url("/admin/orders"),
            "http://localhost:8080/api/admin/orders"
        );
    }
}
