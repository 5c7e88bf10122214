//! Commerce backend REST client.
//!
//! # Architecture
//!
//! - `reqwest` for HTTP, JSON bodies both ways
//! - The backend is source of truth - no local sync, direct API calls
//! - Catalog reads cached in-memory via `moka` (5 minute TTL)
//! - A bearer token from the session is attached to authenticated calls
//!
//! # Example
//!
//! ```rust,ignore
//! use arbor_storefront::backend::ShopClient;
//!
//! let client = ShopClient::new(&config.api_base_url);
//!
//! // Browse the catalog (no token needed)
//! let departments = client.departments().await?;
//!
//! // Read the signed-in user's cart
//! let cart = client.get_cart(token).await?;
//! ```

mod auth;
mod cache;
mod cart;
mod catalog;
mod orders;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use cache::CacheValue;

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

/// Client for the commerce backend's public and user-scoped endpoints.
///
/// Cheaply cloneable via `Arc`. Catalog reads are cached for 5 minutes;
/// cart and order state is never cached.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl ShopClient {
    /// Create a new backend client for the given API base URL
    /// (e.g. `http://localhost:8080/api`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request and decode the JSON response.
    ///
    /// The bearer token, when present, goes out as an `Authorization`
    /// header exactly as the backend's JWT middleware expects.
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

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
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

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.get(self.url(path)), token)
            .await
    }

    /// GET a JSON resource with query parameters.
    async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.get(self.url(path)).query(query), token)
            .await
    }

    /// POST a JSON body and decode the JSON response.
    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.post(self.url(path)).json(body), token)
            .await
    }

    /// PUT a JSON body and decode the JSON response.
    async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.put(self.url(path)).json(body), token)
            .await
    }

    /// PATCH a JSON body and decode the JSON response.
    async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.patch(self.url(path)).json(body), token)
            .await
    }

    /// DELETE a resource and decode the JSON response.
    async fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.execute(self.inner.client.delete(self.url(path)), token)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ShopClient::new("http://localhost:8080/api/");
        assert_eq!(
            client.url("/departments"),
            "http://localhost:8080/api/departments"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product 9".to_string());
        assert_eq!(err.to_string(), "not found: product 9");

        let err = ApiError::Status {
            status: 500,
            message: "server error".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned 500: server error");
    }
}
