//! Broker discovery through the broker registry.
//!
//! # Responsibilities
//! - Query the registry when no explicit broker URL is configured
//! - Turn the broker records into one `;`-joined connection string
//! - Report failures without aborting the bootstrap
//!
//! # Design Decisions
//! - Single request, no retry
//! - Failure leaves `KAFKA_URL` unset; the worker then fails for lack of a broker
//! - Presence of `KAFKA_URL` is checked without marking it read

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::settings::{KAFKA_MANAGER_URL, KAFKA_URL};
use crate::config::{ConfigResult, DiscoveryConfig, Environ};

/// One broker as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerDescriptor {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct RegistryResponse {
    brokers: Vec<BrokerDescriptor>,
}

/// Reasons discovery produced no broker URL.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Broker registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Broker registry returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed broker registry payload: {0}")]
    Payload(String),
}

/// What a discovery run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// `KAFKA_URL` was already set.
    AlreadyConfigured,
    /// No registry URL to ask.
    NoRegistry,
    /// Broker URL discovered and stored.
    Discovered(String),
    /// The registry could not be used; the error was logged.
    Failed,
}

/// Fills in `KAFKA_URL` from the broker registry.
#[derive(Debug, Clone)]
pub struct BrokerDiscoverer {
    config: DiscoveryConfig,
}

impl BrokerDiscoverer {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Run discovery against `environ`.
    ///
    /// Registry failures are logged and reported as `Failed`. Only a write
    /// conflict on `KAFKA_URL` is returned as an error. An empty `KAFKA_URL`
    /// or `KAFKA_MANAGER_URL` counts as unset.
    pub async fn discover(&self, environ: &mut Environ) -> ConfigResult<DiscoveryOutcome> {
        if environ.is_set(KAFKA_URL) {
            tracing::debug!("Broker URL explicitly configured, skipping discovery");
            return Ok(DiscoveryOutcome::AlreadyConfigured);
        }
        if !environ.is_set(KAFKA_MANAGER_URL) {
            return Ok(DiscoveryOutcome::NoRegistry);
        }

        let registry_url = environ.get(KAFKA_MANAGER_URL)?.to_string();
        match self.fetch(&registry_url).await {
            Ok(brokers) => {
                let url = broker_url(&self.config.scheme, &brokers);
                environ.set(KAFKA_URL, url.clone())?;
                tracing::info!(
                    registry = %registry_url,
                    brokers = brokers.len(),
                    "Broker URL discovered"
                );
                Ok(DiscoveryOutcome::Discovered(url))
            }
            Err(e) => {
                tracing::error!(registry = %registry_url, error = %e, "Cannot retrieve Kafka brokers");
                Ok(DiscoveryOutcome::Failed)
            }
        }
    }

    async fn fetch(&self, registry_url: &str) -> Result<Vec<BrokerDescriptor>, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()?;

        let response = client.get(registry_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status(status));
        }

        let body = response.text().await?;
        parse_registry(&body)
    }
}

/// Parse a registry payload of the form `{"brokers": [{"host", "port"}]}`.
pub fn parse_registry(body: &str) -> Result<Vec<BrokerDescriptor>, DiscoveryError> {
    let response: RegistryResponse =
        serde_json::from_str(body).map_err(|e| DiscoveryError::Payload(e.to_string()))?;
    if response.brokers.is_empty() {
        return Err(DiscoveryError::Payload(
            "registry lists no brokers; refusing to configure an empty broker URL".to_string(),
        ));
    }
    Ok(response.brokers)
}

/// Join brokers into `scheme://host:port;scheme://host:port`.
pub fn broker_url(scheme: &str, brokers: &[BrokerDescriptor]) -> String {
    brokers
        .iter()
        .map(|broker| format!("{}://{}:{}", scheme, broker.host, broker.port))
        .collect::<Vec<_>>()
        .join(";")
}
