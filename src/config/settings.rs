//! Typed worker settings.
//!
//! Resolved once, after every injector has run. Resolving marks each
//! environment key as read, so nothing may write these keys afterwards.

use url::Url;
use uuid::Uuid;

use crate::config::error::ConfigResult;
use crate::config::resolver::Config;

pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const DEBUG: &str = "DEBUG";
pub const VERSION: &str = "VERSION";
pub const SECRET: &str = "SECRET";
pub const KAFKA_URL: &str = "KAFKA_URL";
pub const KAFKA_TOPIC: &str = "KAFKA_TOPIC";
pub const KAFKA_CONSUMER_NAME: &str = "KAFKA_CONSUMER_NAME";
pub const KAFKA_MANAGER_URL: &str = "KAFKA_MANAGER_URL";
pub const SCHEMA_REGISTRY_URL: &str = "SCHEMA_REGISTRY_URL";
pub const TESTING: &str = "TESTING";
pub const APP_WEB_HOST: &str = "APP_WEB_HOST";
pub const APP_WEB_PORT: &str = "APP_WEB_PORT";

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_WEB_HOST: &str = "localhost";
pub const DEFAULT_WEB_PORT: &str = "6066";

/// Settings consumed by the worker runtime.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub debug: bool,
    pub environment: String,
    pub version: Option<String>,
    pub secret: Uuid,
    pub kafka_url: Option<String>,
    pub kafka_topic: String,
    pub kafka_consumer_name: String,
    pub schema_registry_url: Url,
    pub testing: bool,
    pub web_host: String,
    pub web_port: u16,
}

impl Settings {
    /// Resolve every setting, failing on the first missing or malformed one.
    pub fn from_config(config: &mut Config) -> ConfigResult<Self> {
        let debug = config.get_bool(DEBUG, Some(false))?;
        let environment = config.get(ENVIRONMENT, Some(DEFAULT_ENVIRONMENT))?;
        let version = config.get_optional(VERSION)?;
        let secret = config.get_with(SECRET, "UUID", Uuid::parse_str, None)?;

        let kafka_url = config.get_optional(KAFKA_URL)?;
        let kafka_topic = config.get(KAFKA_TOPIC, None)?;
        let default_consumer = format!("stream-processor-{}", environment);
        let kafka_consumer_name = config.get(KAFKA_CONSUMER_NAME, Some(default_consumer.as_str()))?;
        let schema_registry_url = config.get_with(SCHEMA_REGISTRY_URL, "URL", Url::parse, None)?;

        let testing = config.get_bool(TESTING, Some(false))?;

        let web_host = config.get(APP_WEB_HOST, Some(DEFAULT_WEB_HOST))?;
        let web_port = config.get_parsed::<u16>(APP_WEB_PORT, DEFAULT_WEB_PORT.parse().ok())?;

        Ok(Self {
            debug,
            environment,
            version,
            secret,
            kafka_url,
            kafka_topic,
            kafka_consumer_name,
            schema_registry_url,
            testing,
            web_host,
            web_port,
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("debug", &self.debug)
            .field("environment", &self.environment)
            .field("version", &self.version)
            .field("secret", &"<redacted>")
            .field("kafka_url", &self.kafka_url)
            .field("kafka_topic", &self.kafka_topic)
            .field("kafka_consumer_name", &self.kafka_consumer_name)
            .field("schema_registry_url", &self.schema_registry_url.as_str())
            .field("testing", &self.testing)
            .field("web_host", &self.web_host)
            .field("web_port", &self.web_port)
            .finish()
    }
}
