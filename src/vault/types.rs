//! Secret store types and error definitions.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::ConfigError;

/// Secret key → value pairs read from one vault path.
pub type SecretBundle = BTreeMap<String, String>;

/// Errors that can occur while injecting secrets.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Neither the environment variable nor the fallback file held a token.
    #[error("Vault token '{name}' not found in environment or file \"{file}\"")]
    TokenNotFound { name: String, file: String },

    /// A variable needed to locate the secrets is not set.
    #[error("Variable '{0}' not found")]
    ConfigMissing(String),

    /// The AppID handshake did not produce an authenticated session.
    #[error("Vault authentication error: {0}")]
    Auth(String),

    /// The read response has no `data` object.
    #[error("Wrong response from Vault \"{0}\"")]
    Response(String),

    /// The session was used after it was released.
    #[error("Vault client is not initialized")]
    NotInitialized,

    /// `VAULT_URL` is not a usable URL.
    #[error("Invalid vault URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure talking to vault.
    #[error("Vault request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Merging a secret collided with an already-read key.
    #[error(transparent)]
    Environ(#[from] ConfigError),
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;
