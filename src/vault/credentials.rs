//! AppID credential resolution.
//!
//! # Security
//! - Tokens come from environment variables or local files only
//! - Tokens are never logged; `Debug` is redacted

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::sources::{first_match, Source, Tier};
use crate::config::Environ;
use crate::vault::types::{VaultError, VaultResult};

/// Environment variable holding the application id.
pub const APP_ID_ENV_VAR: &str = "VAULT_APP_ID";
/// Environment variable holding the user id.
pub const USER_ID_ENV_VAR: &str = "VAULT_USER_ID";
/// Fallback file for the application id, relative to the credentials dir.
pub const APP_ID_FILE: &str = "appid";
/// Fallback file for the user id, relative to the credentials dir.
pub const USER_ID_FILE: &str = "userid";

/// Paired identifiers for the AppID handshake.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultCredential {
    pub app_id: String,
    pub user_id: String,
}

impl VaultCredential {
    /// Resolve both tokens, environment first, then the fallback files.
    pub fn resolve(environ: &mut Environ, credentials_dir: &Path) -> VaultResult<Self> {
        let app_id = resolve_token(environ, APP_ID_ENV_VAR, credentials_dir.join(APP_ID_FILE))?;
        let user_id = resolve_token(environ, USER_ID_ENV_VAR, credentials_dir.join(USER_ID_FILE))?;
        Ok(Self { app_id, user_id })
    }
}

impl std::fmt::Debug for VaultCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCredential")
            .field("app_id", &"<redacted>")
            .field("user_id", &"<redacted>")
            .finish()
    }
}

/// A token stored on the first line of a file.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Source for TokenFile {
    fn tier(&self) -> Tier {
        Tier::File
    }

    fn fetch(&mut self, _key: &str) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        content
            .lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
    }
}

fn resolve_token(environ: &mut Environ, env_var: &str, file: PathBuf) -> VaultResult<String> {
    let mut token_file = TokenFile::new(file.clone());
    match first_match(env_var, &mut [&mut *environ, &mut token_file]) {
        Some(value) => {
            tracing::debug!(token = env_var, tier = %value.tier, "Vault token resolved");
            Ok(value.raw)
        }
        None => Err(VaultError::TokenNotFound {
            name: env_var.to_string(),
            file: file.display().to_string(),
        }),
    }
}
