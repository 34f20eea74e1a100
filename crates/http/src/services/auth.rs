//! Login, registration and logout

use crate::client::{ApiClient, ApiResponse, ClientError, Notification};
use carecom_core::{
    CredentialStoreExt, Credentials, Role, TokenClaims, decode_claims, message_of,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    /// Dashboard the user was sent to
    pub redirect: String,
    pub message: Option<String>,
}

/// Authentication endpoints
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in, persist the token and role, and open the role's dashboard
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.post("/auth/login", &request).await?;
        let claims = match self.store_session(&response) {
            Ok(claims) => claims,
            Err(error) => {
                warn!("login response rejected: {error}");
                self.client.notifier().notify(Notification::error(
                    "Login Gagal",
                    "Sesi login tidak dapat dibaca. Silakan coba lagi.",
                ));
                return Err(error);
            }
        };

        let redirect = claims.role.dashboard_path().to_string();
        info!(role = %claims.role, %redirect, "logged in");
        self.client.navigator().navigate(&redirect);

        Ok(LoginOutcome {
            role: claims.role,
            redirect,
            message: message_of(response.body()),
        })
    }

    /// Persist the token from a login response and return its claims
    fn store_session(&self, response: &ApiResponse) -> Result<TokenClaims, ClientError> {
        let token = login_token(response)?;
        let claims = decode_claims(&token)?;
        self.client.credentials().save(&Credentials {
            token,
            role: claims.role,
        })?;
        Ok(claims)
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse, ClientError> {
        self.client.post("/auth/register", request).await
    }

    /// Forget the stored credentials and return to the login view
    pub fn logout(&self) -> Result<(), ClientError> {
        if let Err(e) = self.client.credentials().clear() {
            warn!("failed to clear credentials on logout: {e}");
            return Err(e.into());
        }
        info!("logged out");
        self.client.navigator().navigate(self.client.login_path());
        Ok(())
    }

    /// Role of the stored session, if any
    pub fn current_role(&self) -> Option<Role> {
        self.client.credentials().role()
    }
}

fn login_token(response: &ApiResponse) -> Result<String, ClientError> {
    response
        .body()
        .pointer("/data/token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .ok_or_else(|| ClientError::Decode("login response has no data.token".to_string()))
}
