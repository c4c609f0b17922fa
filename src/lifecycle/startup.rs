//! Startup orchestration.
//!
//! # Responsibilities
//! - Run every bootstrap step in dependency order
//! - Hand back the resolved environ and settings for the worker
//!
//! # Design Decisions
//! - Fail fast: any error except broker discovery is fatal
//! - Steps run sequentially; each may write values the next one reads
//! - Settings are resolved last, once nothing else will write the environ

use std::path::PathBuf;

use thiserror::Error;

use crate::config::settings::{
    APP_WEB_HOST, APP_WEB_PORT, DEFAULT_WEB_HOST, DEFAULT_WEB_PORT, ENVIRONMENT,
};
use crate::config::{BootstrapConfig, Config, ConfigError, Environ, Settings};
use crate::discovery::{BrokerDiscoverer, DiscoveryOutcome};
use crate::health::{HostSpec, LivenessChecker, LivenessError, LivenessReport};
use crate::lifecycle::worker::WorkerError;
use crate::vault::{InjectionOutcome, SecretInjector, VaultError};

/// Any failure that aborts the bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Liveness(#[from] LivenessError),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

/// Per-run inputs, usually from the command line.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Environment name used for gating and the secret path.
    pub environment: String,

    /// Override file, second configuration tier.
    pub env_file: PathBuf,

    /// Hosts that must be reachable before the worker starts.
    pub check_hosts: Vec<HostSpec>,
}

/// Everything the worker launch needs.
#[derive(Debug)]
pub struct Prepared {
    pub environ: Environ,
    pub settings: Settings,
    pub injection: InjectionOutcome,
    pub discovery: DiscoveryOutcome,
    pub liveness: Vec<LivenessReport>,
}

/// The bootstrap pipeline.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    config: BootstrapConfig,
    options: BootstrapOptions,
}

impl Bootstrap {
    pub fn new(config: BootstrapConfig, options: BootstrapOptions) -> Self {
        Self { config, options }
    }

    /// Run the pipeline over `environ`.
    ///
    /// Order: secrets → application defaults → override file → broker
    /// discovery → host checks → settings.
    pub async fn prepare(&self, mut environ: Environ) -> Result<Prepared, BootstrapError> {
        let environment = self.options.environment.as_str();
        tracing::info!(environment, variables = environ.len(), "Bootstrap starting");

        let injector = SecretInjector::new(self.config.vault.clone());
        let injection = injector.inject(environment, &mut environ).await?;

        inject_app_defaults(&mut environ, environment)?;

        let mut config = Config::with_env_file(environ, &self.options.env_file)?;

        let discoverer = BrokerDiscoverer::new(self.config.discovery.clone());
        let discovery = discoverer.discover(config.environ_mut()).await?;

        let mut checker = LivenessChecker::new(&self.config.liveness);
        let liveness = checker.check_all(&self.options.check_hosts).await?;

        let settings = Settings::from_config(&mut config)?;
        tracing::info!(
            environment = %settings.environment,
            topic = %settings.kafka_topic,
            consumer = %settings.kafka_consumer_name,
            broker_configured = settings.kafka_url.is_some(),
            "Settings resolved"
        );
        if settings.kafka_url.is_none() {
            tracing::warn!("No broker URL configured or discovered; the worker will not find a broker");
        }

        Ok(Prepared {
            environ: config.into_environ(),
            settings,
            injection,
            discovery,
            liveness,
        })
    }
}

/// Settings the worker expects in its environment, set only when absent.
fn inject_app_defaults(environ: &mut Environ, environment: &str) -> Result<(), ConfigError> {
    environ.set_default(ENVIRONMENT, environment)?;
    environ.set_default(APP_WEB_HOST, DEFAULT_WEB_HOST)?;
    environ.set_default(APP_WEB_PORT, DEFAULT_WEB_PORT)?;
    Ok(())
}
