//! Secret injection into the environ.

use std::time::Duration;

use crate::config::{ConfigError, Environ, VaultConfig};
use crate::vault::client::{VaultClient, VaultSession};
use crate::vault::credentials::VaultCredential;
use crate::vault::gating::should_inject;
use crate::vault::types::{SecretBundle, VaultError, VaultResult};

/// Vault server URL.
pub const VAULT_URL: &str = "VAULT_URL";
/// Namespace segment of the secret path.
pub const VAULT_NAMESPACE: &str = "VAULT_NAMESPACE";
/// Application segment of the secret path.
pub const VAULT_APP: &str = "VAULT_APP";

/// What an injection run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// The environment is gated out.
    Skipped,
    /// Secrets were merged; holds the injected key names.
    Injected(Vec<String>),
}

/// Injects vault secrets for an environment into the environ.
#[derive(Debug, Clone)]
pub struct SecretInjector {
    config: VaultConfig,
}

impl SecretInjector {
    pub fn new(config: VaultConfig) -> Self {
        Self { config }
    }

    /// Whether injection runs for `environment`.
    pub fn is_enabled_for(&self, environment: &str) -> bool {
        should_inject(environment, &self.config.allow, &self.config.deny)
    }

    /// Fetch the secret bundle for `environment` and merge it into `environ`.
    ///
    /// Must run before anything reads the keys it writes; a collision with an
    /// already-read key fails with `EnvironConflict`.
    pub async fn inject(&self, environment: &str, environ: &mut Environ) -> VaultResult<InjectionOutcome> {
        if !self.is_enabled_for(environment) {
            tracing::info!(environment, "Vault injection skipped for environment");
            return Ok(InjectionOutcome::Skipped);
        }

        tracing::info!(environment, "Injecting vault data");

        let url = require(environ, VAULT_URL)?;
        let path = secret_path(
            environment,
            &require(environ, VAULT_NAMESPACE)?,
            &require(environ, VAULT_APP)?,
        );
        let credential = VaultCredential::resolve(environ, &self.config.credentials_dir)?;

        let client = VaultClient::new(&url, Duration::from_secs(self.config.timeout_secs))?;
        let mut session = client.login_app_id(&credential).await?;
        let secrets = secrets_then_release(&mut session, &path).await?;

        let mut injected = Vec::with_capacity(secrets.len());
        for (key, value) in secrets {
            environ.set(key.clone(), value)?;
            injected.push(key);
        }

        tracing::info!(
            path = %path,
            variables = %injected.join(", "),
            "Variables injected from Vault"
        );
        Ok(InjectionOutcome::Injected(injected))
    }
}

/// Vault path holding the secrets of one application.
pub fn secret_path(environment: &str, namespace: &str, app: &str) -> String {
    format!("secret/{}/{}/{}", environment, namespace, app)
}

/// Read `path`, then release the session whatever the outcome.
async fn secrets_then_release(session: &mut VaultSession, path: &str) -> VaultResult<SecretBundle> {
    let fetched = session.secrets(path).await;
    session.release();
    fetched
}

fn require(environ: &mut Environ, key: &str) -> VaultResult<String> {
    match environ.get(key) {
        Ok(value) => Ok(value.to_string()),
        Err(ConfigError::KeyNotFound(_)) => Err(VaultError::ConfigMissing(key.to_string())),
        Err(e) => Err(e.into()),
    }
}
