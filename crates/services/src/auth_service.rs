use std::env;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use vocab_core::model::UserId;

use crate::error::AuthError;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// An authenticated session as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
}

/// Account details from a token lookup (no fresh tokens).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub user_id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub email_verified: bool,
}

/// Fresh tokens from a refresh exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub id_token: String,
    pub refresh_token: String,
}

/// Client for the hosted identity provider's REST API.
#[derive(Clone)]
pub struct AuthService {
    client: Client,
    api_key: Option<String>,
    accounts_url: String,
    token_url: String,
}

impl AuthService {
    /// Reads `FIREBASE_API_KEY` from the environment; a missing key leaves
    /// the service unconfigured and every call fails with `MissingApiKey`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            env::var("FIREBASE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        )
    }

    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            accounts_url: IDENTITY_TOOLKIT_URL.to_owned(),
            token_url: SECURE_TOKEN_URL.to_owned(),
        }
    }

    /// Point the service at a different endpoint (tests, emulators).
    #[must_use]
    pub fn with_accounts_url(mut self, accounts_url: impl Into<String>) -> Self {
        self.accounts_url = accounts_url.into();
        self
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Create a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` with the provider's error code (e.g.
    /// `EMAIL_EXISTS`) on rejection, transport errors otherwise.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AuthUser, AuthError> {
        let payload = json!({
            "email": email,
            "displayName": username,
            "password": password,
            "returnSecureToken": true,
        });
        self.account_request("signUp", &payload).await
    }

    /// Sign in an existing account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` with the provider's error code (e.g.
    /// `EMAIL_NOT_FOUND`, `INVALID_PASSWORD`) on rejection.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let payload = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.account_request("signInWithPassword", &payload).await
    }

    /// Exchange a refresh token for a fresh id token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for an expired or revoked refresh
    /// token, transport errors otherwise.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, AuthError> {
        let api_key = self.api_key()?;
        let url = format!("{}?key={api_key}", self.token_url);
        let payload = json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        });

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let data: RefreshResponse = response.json().await?;
        Ok(RefreshedTokens {
            id_token: data.id_token,
            refresh_token: data.refresh_token,
        })
    }

    /// Check a session token and return the account it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` when the token is not accepted.
    pub async fn verify_token(&self, id_token: &str) -> Result<AccountInfo, AuthError> {
        let api_key = self.api_key()?;
        let url = format!("{}:lookup?key={api_key}", self.accounts_url);
        let payload = json!({ "idToken": id_token });

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let data: LookupResponse = response.json().await?;
        let user = data
            .users
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidToken)?;
        Ok(AccountInfo {
            user_id: UserId::new(user.local_id),
            email: user.email,
            username: user.display_name.filter(|name| !name.is_empty()),
            email_verified: user.email_verified,
        })
    }

    /// Trigger a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` with the provider's error code on
    /// rejection.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let api_key = self.api_key()?;
        let url = format!("{}:sendOobCode?key={api_key}", self.accounts_url);
        let payload = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });

        let response = self.client.post(url).json(&payload).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    async fn account_request(
        &self,
        action: &str,
        payload: &Value,
    ) -> Result<AuthUser, AuthError> {
        let api_key = self.api_key()?;
        let url = format!("{}:{action}?key={api_key}", self.accounts_url);

        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let data: TokenResponse = response.json().await?;
        tracing::debug!(action, "identity provider request succeeded");
        Ok(AuthUser {
            user_id: UserId::new(data.local_id),
            email: data.email,
            username: data.display_name.filter(|name| !name.is_empty()),
            id_token: data.id_token,
            refresh_token: data.refresh_token,
        })
    }

    fn api_key(&self) -> Result<&str, AuthError> {
        self.api_key.as_deref().ok_or(AuthError::MissingApiKey)
    }
}

/// Extract the provider's error code from a rejection body.
async fn api_error(response: reqwest::Response) -> AuthError {
    let code = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| "UNKNOWN".to_owned());
    AuthError::Api { code }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}
