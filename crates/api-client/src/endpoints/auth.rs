//! Authentication endpoints

use crate::client::ApiService;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Authentication API interface
#[derive(Clone)]
pub struct AuthApi {
    client: ApiService,
}

impl AuthApi {
    /// Create a new auth API interface
    pub(crate) fn new(client: ApiService) -> Self {
        Self { client }
    }

    /// Log in as the site admin.
    ///
    /// POST /auth/login
    ///
    /// A token in the response becomes the client's session token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .client
            .post("auth/login", &LoginRequest { username, password })
            .await?;

        if let Some(token) = response.token.as_deref() {
            self.client.set_auth_token(Some(token))?;
            info!(username, "Logged in");
        }

        Ok(response)
    }

    /// Drop the session token. No request is sent.
    pub fn logout(&self) -> ApiResult<()> {
        self.client.logout()
    }

    /// Check that the current token is accepted
    ///
    /// GET /auth/verify
    pub async fn verify(&self) -> ApiResult<TokenVerification> {
        self.client.get("auth/verify").await
    }

    /// Fetch the logged-in admin's profile
    ///
    /// GET /auth/profile
    pub async fn profile(&self) -> ApiResult<AdminProfile> {
        self.client.get("auth/profile").await
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Session token, present on success
    pub token: Option<String>,
    /// Server message
    pub message: Option<String>,
}

/// Token verification response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    pub username: String,
}

/// Admin profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub username: String,
    pub created_at: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
