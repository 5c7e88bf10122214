//! Auth methods: register, login, identity.

use tracing::instrument;

use arbor_core::User;

use super::types::{LoginRequest, RegisterRequest, TokenResponse};
use super::{ApiError, ShopClient};

impl ShopClient {
    /// Register a new account. The backend responds with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/auth/register", request, None).await
    }

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
        self.post_json("/auth/login", &request, None).await
    }

    /// Fetch the identity behind a bearer token ("who am I").
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for a stale token, or another
    /// error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.get_json("/user/me", Some(token)).await
    }
}
