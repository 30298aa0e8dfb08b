// src/auth/client.rs
use crate::config::Credentials;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

/// Bearer credential returned by the login endpoint. Opaque, immutable,
/// valid for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to build login client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid login url: {0}")]
    Url(#[from] url::ParseError),

    #[error("login request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("login response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("login response carried no token")]
    MissingToken,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    account: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: String,
}

/// Exchanges credentials for a session token with a single login call.
/// No retries, no token refresh.
pub struct Authenticator {
    base_url: Url,
    client: Client,
}

impl Authenticator {
    pub fn new(base_url: Url, insecure: bool) -> Result<Self, AuthError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(AuthError::Client)?;

        Ok(Self { base_url, client })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<SessionToken, AuthError> {
        let url = self.base_url.join("/api/login")?;

        debug!(
            "logging in as {} (account {})",
            credentials.email, credentials.account
        );

        let response = self
            .client
            .post(url)
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
                account: &credentials.account,
            })
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let body = response.text().await.map_err(AuthError::Transport)?;
        let parsed: LoginResponse = serde_json::from_str(&body).map_err(AuthError::Decode)?;

        if parsed.token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        info!("login succeeded for account {}", credentials.account);
        Ok(SessionToken(parsed.token))
    }
}
