//! Vault HTTP client with AppID authentication.
//!
//! # Responsibilities
//! - Perform the AppID login handshake
//! - Verify the resulting token is accepted
//! - Read one secret path and extract its `data` object
//!
//! # Design Decisions
//! - A session is scoped to one injection and released right after the read
//! - Every request carries a timeout
//! - A 404 on read is reported as a wrong response, not an empty bundle

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::vault::credentials::VaultCredential;
use crate::vault::types::{SecretBundle, VaultError, VaultResult};

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Unauthenticated handle on a vault server.
#[derive(Debug, Clone)]
pub struct VaultClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Debug, Deserialize)]
struct LoginAuth {
    client_token: String,
}

impl VaultClient {
    /// Create a client for the vault server at `url`.
    pub fn new(url: &str, timeout: Duration) -> VaultResult<Self> {
        let parsed = url::Url::parse(url).map_err(|e| VaultError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(VaultError::InvalidUrl {
                url: url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Log in with the AppID method and return an authenticated session.
    pub async fn login_app_id(&self, credential: &VaultCredential) -> VaultResult<VaultSession> {
        let response = self
            .http
            .post(self.endpoint("auth/app-id/login"))
            .json(&json!({
                "app_id": credential.app_id,
                "user_id": credential.user_id,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VaultError::Auth(format!("login returned status {}", status)));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| VaultError::Auth(format!("malformed login response: {}", e)))?;
        let token = body
            .auth
            .map(|auth| auth.client_token)
            .ok_or_else(|| VaultError::Auth("login response has no client token".to_string()))?;

        let session = VaultSession {
            client: self.clone(),
            token: Some(token),
        };

        if !session.is_authenticated().await? {
            return Err(VaultError::Auth("token was not accepted".to_string()));
        }

        tracing::debug!(url = %self.base_url, "Vault session authenticated");
        Ok(session)
    }
}

/// Authenticated vault session.
///
/// The token is cleared by [`VaultSession::release`] or on drop.
pub struct VaultSession {
    client: VaultClient,
    token: Option<String>,
}

impl VaultSession {
    #[cfg(test)]
    pub(crate) fn with_token(client: VaultClient, token: &str) -> Self {
        Self {
            client,
            token: Some(token.to_string()),
        }
    }

    fn token(&self) -> VaultResult<&str> {
        self.token.as_deref().ok_or(VaultError::NotInitialized)
    }

    /// Ask vault whether the session token is valid.
    pub async fn is_authenticated(&self) -> VaultResult<bool> {
        let response = self
            .client
            .http
            .get(self.client.endpoint("auth/token/lookup-self"))
            .header(TOKEN_HEADER, self.token()?)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            status => Err(VaultError::Auth(format!("token lookup returned status {}", status))),
        }
    }

    /// Read a raw secret path. `None` when vault has nothing there.
    pub async fn read(&self, path: &str) -> VaultResult<Option<Value>> {
        let response = self
            .client
            .http
            .get(self.client.endpoint(path))
            .header(TOKEN_HEADER, self.token()?)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = response.text().await?;
        if !status.is_success() {
            return Err(VaultError::Response(text));
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|_| VaultError::Response(text))
    }

    /// Read `path` and return its `data` object as a secret bundle.
    pub async fn secrets(&self, path: &str) -> VaultResult<SecretBundle> {
        let response = self.read(path).await?;
        match response {
            Some(Value::Object(mut body)) => match body.remove("data") {
                Some(Value::Object(data)) => Ok(data
                    .into_iter()
                    .map(|(key, value)| (key, secret_to_string(value)))
                    .collect()),
                other => {
                    if let Some(data) = other {
                        body.insert("data".to_string(), data);
                    }
                    Err(VaultError::Response(Value::Object(body).to_string()))
                }
            },
            Some(other) => Err(VaultError::Response(other.to_string())),
            None => Err(VaultError::Response(String::new())),
        }
    }

    /// Drop the token. Later calls fail with `NotInitialized`.
    pub fn release(&mut self) {
        self.token = None;
    }

    pub fn is_released(&self) -> bool {
        self.token.is_none()
    }
}

impl Drop for VaultSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("url", &self.client.base_url)
            .field("released", &self.is_released())
            .finish()
    }
}

fn secret_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
